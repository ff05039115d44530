
use anyhow::{bail, Result};

use super::types::CreateUserParams;
use super::Database;

pub fn run_tests(db: &Database) {
    user::run_user_tests(db);
    package::run_package_tests(db);
    role::run_role_tests(db);

    test_rollback(db);
}

fn test_rollback(db: &Database) {
    let mut created = 0;
    let result: Result<()> = db.with_transaction(|tx| {
        created = tx
            .create_user(CreateUserParams {
                name: String::from("none"),
                admin: true,
                update_time: 50,
            })
            .unwrap();

        bail!("rollback");
    });
    assert!(result.is_err());

    db.with_transaction(|tx| {
        assert!(tx.get_user(created).is_err());
        Ok(())
    })
    .unwrap();
}
