use super::*;

#[test]
fn parses_bare_update_command() {
    let cli = Cli::try_parse_from(["lotto-cli", "update"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Update {
            range: None,
            out: None,
            latest: None,
            refresh: false,
        }
    ));
}

#[test]
fn parses_update_with_all_flags() {
    let cli = Cli::try_parse_from([
        "lotto-cli",
        "update",
        "--range",
        "10",
        "--out",
        "tmp/snap.json",
        "--latest",
        "1250",
        "--refresh",
    ])
    .unwrap();

    assert!(matches!(
        cli.command,
        Commands::Update {
            range: Some(10),
            out: Some(ref out),
            latest: Some(1250),
            refresh: true,
        } if out == &PathBuf::from("tmp/snap.json")
    ));
}

#[test]
fn update_rejects_zero_range() {
    assert!(Cli::try_parse_from(["lotto-cli", "update", "--range", "0"]).is_err());
}

#[test]
fn update_rejects_non_numeric_latest() {
    assert!(Cli::try_parse_from(["lotto-cli", "update", "--latest", "soon"]).is_err());
}

#[test]
fn parses_update_stores_command() {
    let cli = Cli::try_parse_from(["lotto-cli", "update-stores"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::UpdateStores {
            range: None,
            out: None,
            latest: None,
        }
    ));

    let cli = Cli::try_parse_from([
        "lotto-cli",
        "update-stores",
        "--range",
        "5",
        "--out",
        "data/winner_stores.json",
        "--latest",
        "1153",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::UpdateStores {
            range: Some(5),
            out: Some(ref out),
            latest: Some(1153),
        } if out == &PathBuf::from("data/winner_stores.json")
    ));
}

#[test]
fn update_stores_rejects_refresh_flag() {
    assert!(Cli::try_parse_from(["lotto-cli", "update-stores", "--refresh"]).is_err());
}

#[test]
fn parses_check_with_multiple_data_files() {
    let cli = Cli::try_parse_from([
        "lotto-cli",
        "check",
        "--data-files",
        "data/region_1to2.json",
        "data/prize_2to5.json",
    ])
    .unwrap();

    match cli.command {
        Commands::Check { data_files } => assert_eq!(
            data_files,
            vec![
                PathBuf::from("data/region_1to2.json"),
                PathBuf::from("data/prize_2to5.json")
            ]
        ),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_check_without_data_files() {
    let cli = Cli::try_parse_from(["lotto-cli", "check"]).unwrap();
    assert!(matches!(cli.command, Commands::Check { ref data_files } if data_files.is_empty()));
}

#[test]
fn parses_round_command() {
    let cli = Cli::try_parse_from(["lotto-cli", "round", "1150"]).unwrap();
    assert!(matches!(cli.command, Commands::Round { round: 1150 }));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["lotto-cli"]).is_err());
}
