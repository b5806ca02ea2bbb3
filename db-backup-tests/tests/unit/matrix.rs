//! The database type × execution method matrix against a mock executor

use db_backup::config::{DatabaseType, ExecutionMethod};
use rstest::rstest;
use std::sync::Arc;
use test_utils::{du_output, BackupManager, ConfigBuilder, MockExecutor, MockResponse, BATCH_STAMP};

#[rstest]
fn test_every_cell_succeeds(
    #[values(
        DatabaseType::Postgres,
        DatabaseType::Mysql,
        DatabaseType::Mariadb,
        DatabaseType::Mongodb
    )]
    db_type: DatabaseType,
    #[values(
        ExecutionMethod::DockerRun,
        ExecutionMethod::DockerExec,
        ExecutionMethod::KubectlExec
    )]
    method: ExecutionMethod,
) {
    let builder = ConfigBuilder::new()
        .with_method(method.as_str())
        .add_database(db_type.as_str(), "app")
        .with_password("s3cr3t-pw");
    let executor = MockExecutor::new()
        .with_default_response(MockResponse::stdout("dump"))
        .expect("du", MockResponse::stdout(&du_output("8.0K")));

    let outcomes = BackupManager::with_executor(Arc::new(executor.clone())).run(&builder.jobs());

    assert_eq!(outcomes.len(), 1);
    let outcome = &outcomes[0];
    assert!(outcome.success(), "{:?}", outcome.failure());
    assert_eq!(outcome.size(), Some("8.0K"));

    let type_dir = builder.backup_dir().join(db_type.as_str());
    let expected = if db_type == DatabaseType::Mongodb {
        type_dir.join(BATCH_STAMP)
    } else {
        type_dir.join(format!("app_{}.sql", BATCH_STAMP))
    };
    assert_eq!(outcome.artifact_path(), expected);

    // every external call goes through the method's program, plus du
    for call in executor.get_calls() {
        assert!(call.program == method.program() || call.program == "du");
        assert!(!call.args.iter().any(|a| a.contains("s3cr3t-pw")));
    }
}

#[rstest]
#[case(ExecutionMethod::DockerExec, 3)]
#[case(ExecutionMethod::KubectlExec, 3)]
#[case(ExecutionMethod::DockerRun, 1)]
fn test_mongodb_phase_count(#[case] method: ExecutionMethod, #[case] phases: usize) {
    let builder = ConfigBuilder::new()
        .with_method(method.as_str())
        .add_database("mongodb", "events");
    let executor = MockExecutor::new();

    BackupManager::with_executor(Arc::new(executor.clone())).run(&builder.jobs());

    assert_eq!(executor.call_count(method.program()), phases);
}
