use std::sync::Arc;

use anyhow::{anyhow, Result};
use finrepo_authz::authz::config::AuthzConfig;
use finrepo_authz::authz::{Authorizer, AuthzRequest, AuthzResponse};
use finrepo_authz::config::CommonConfig;
use finrepo_authz::context::{AuthzContext, RequestContext};
use finrepo_authz::db::types::{
    CreatePackageParams, CreateReleaseParams, CreateUserParams, RoleRecord,
};
use finrepo_authz::db::Database;
use finrepo_authz::error::AuthzError;
use finrepo_authz::gate;
use finrepo_authz::inspect::Object;
use finrepo_authz::path::FieldPath;
use finrepo_authz::registry::ModelRegistry;
use finrepo_authz::types::principal::Principal;
use finrepo_authz::types::role::RoleRule;
use serde_json::json;

struct Env {
    shared: Arc<AuthzContext>,
    admin: i64,
    alice: i64,
    bob: i64,
    package: i64,
    release: i64,
}

fn setup() -> Env {
    let db = Database::memory().unwrap();
    let (admin, alice, bob, package, release) = db
        .with_transaction(|tx| {
            let user = |name: &str, admin: bool| {
                tx.create_user(CreateUserParams {
                    name: name.to_string(),
                    admin,
                    update_time: 1,
                })
            };
            let admin = user("root", true)?;
            let alice = user("alice", false)?;
            let bob = user("bob", false)?;

            let package = tx.create_package(CreatePackageParams {
                name: String::from("fin-utils"),
                short_description: String::from("Utilities"),
                owner_id: alice,
                update_time: 1,
            })?;
            let release = tx.create_release(CreateReleaseParams {
                package_id: package,
                version: String::from("0.3.1"),
                update_time: 1,
            })?;

            tx.create_role(&RoleRecord {
                name: String::from("publisher"),
                rules: vec![RoleRule::new(["release"], ["create"])],
                update_time: 1,
            })?;
            tx.create_user_role(bob, "publisher")?;

            Ok((admin, alice, bob, package, release))
        })
        .unwrap();

    let shared = AuthzContext::build(&AuthzConfig::default(), Arc::new(db));
    Env {
        shared: Arc::new(shared),
        admin,
        alice,
        bob,
        package,
        release,
    }
}

impl Env {
    fn as_user(&self, id: i64) -> RequestContext {
        let user = self
            .shared
            .db()
            .with_transaction(|tx| tx.get_user(id))
            .unwrap();
        RequestContext::with_principal(self.shared.clone(), Principal::from(&user))
    }

    fn anonymous(&self) -> RequestContext {
        RequestContext::anonymous(self.shared.clone())
    }

    fn load(&self, model: &str, id: i64) -> Object {
        self.shared
            .db()
            .with_transaction(|tx| self.shared.registry().load(tx, model, id))
            .unwrap()
    }
}

#[derive(Debug, PartialEq)]
enum ApiError {
    Authz(AuthzError),
    NotFound,
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        ApiError::Authz(err)
    }
}

fn path(s: &str) -> FieldPath {
    FieldPath::parse(s).unwrap()
}

#[tokio::test]
async fn admin_only() {
    let env = setup();

    let result = gate::admin_only(&env.as_user(env.admin), || async {
        Ok::<_, ApiError>("done")
    })
    .await;
    assert_eq!(result, Ok("done"));

    for ctx in [env.as_user(env.alice), env.anonymous()] {
        let mut called = false;
        let result = gate::admin_only(&ctx, || {
            called = true;
            async { Ok::<_, ApiError>("done") }
        })
        .await;
        assert_eq!(result, Err(ApiError::Authz(AuthzError::AccessDenied)));
        assert!(!called);
    }

    // Errors of the protected operation are passed through
    let result = gate::admin_only(&env.as_user(env.admin), || async {
        Err::<(), _>(ApiError::NotFound)
    })
    .await;
    assert_eq!(result, Err(ApiError::NotFound));
}

#[tokio::test]
async fn owner_or_admin() {
    let env = setup();
    let package = env.load("Package", env.package);
    let owner = path("ownerID");

    let check = |ctx: RequestContext, object: Object, path: FieldPath| async move {
        gate::owner_or_admin(&ctx, &object, &path, || async { Ok::<_, AuthzError>(()) }).await
    };

    assert_eq!(
        check(env.as_user(env.alice), package.clone(), owner.clone()).await,
        Ok(())
    );
    assert_eq!(
        check(env.as_user(env.bob), package.clone(), owner.clone()).await,
        Err(AuthzError::AccessDenied)
    );
    assert_eq!(
        check(env.anonymous(), package.clone(), owner.clone()).await,
        Err(AuthzError::AccessDenied)
    );

    // Admins pass whatever the resource looks like
    let odd = Object::mapping(json!({"title": "none"})).unwrap();
    assert_eq!(
        check(env.as_user(env.admin), odd, path("title")).await,
        Ok(())
    );

    // Users own themselves
    let alice = env.load("User", env.alice);
    assert_eq!(
        check(env.as_user(env.alice), alice.clone(), path("id")).await,
        Ok(())
    );
    assert_eq!(
        check(env.as_user(env.bob), alice, path("id")).await,
        Err(AuthzError::AccessDenied)
    );

    // Partially loaded release, the package is loaded on demand
    let release = Object::typed(
        "Release",
        json!({
            "id": env.release,
            "packageID": env.package,
            "version": "0.3.1",
            "package": null,
        }),
    )
    .unwrap();
    assert_eq!(
        check(env.as_user(env.alice), release.clone(), path("package.owner.id")).await,
        Ok(())
    );
    assert_eq!(
        check(env.as_user(env.alice), release, path("[packageID,Package].ownerID")).await,
        Ok(())
    );

    // Arguments of a mutation
    let args = Object::mapping(json!({"projectID": env.package})).unwrap();
    assert_eq!(
        check(env.as_user(env.bob), args, path("[projectID,Package].ownerID")).await,
        Err(AuthzError::AccessDenied)
    );

    // Wrong path for the resource
    let mut called = false;
    let result = gate::owner_or_admin(&env.as_user(env.alice), &package, &path("name"), || {
        called = true;
        async { Ok::<_, AuthzError>(()) }
    })
    .await;
    assert!(matches!(result, Err(AuthzError::Internal(msg)) if msg.contains("holds a string")));
    assert!(!called);

    // The referenced package does not exist
    let args = Object::mapping(json!({"projectID": env.package + 100})).unwrap();
    let mut called = false;
    let result = gate::owner_or_admin(
        &env.as_user(env.alice),
        &args,
        &path("[projectID,Package].ownerID"),
        || {
            called = true;
            async { Ok::<_, AuthzError>(()) }
        },
    )
    .await;
    assert!(matches!(result, Err(AuthzError::Internal(_))));
    assert!(!called);
}

#[tokio::test]
async fn check_permission() {
    let env = setup();
    let package = env.load("Package", env.package);
    let release = env.load("Release", env.release);

    let check = |ctx: RequestContext, object: Object, permission: &'static str| async move {
        gate::check_permission(&ctx, &object, permission, || async {
            Ok::<_, AuthzError>(())
        })
        .await
    };

    // Owner permissions
    assert_eq!(
        check(env.as_user(env.alice), package.clone(), "edit").await,
        Ok(())
    );
    assert_eq!(
        check(env.as_user(env.alice), package.clone(), "delete").await,
        Err(AuthzError::AccessDenied)
    );

    // Role permissions
    assert_eq!(
        check(env.as_user(env.bob), release.clone(), "create").await,
        Ok(())
    );
    assert_eq!(
        check(env.as_user(env.bob), package.clone(), "edit").await,
        Err(AuthzError::AccessDenied)
    );

    assert_eq!(
        check(env.as_user(env.admin), package.clone(), "delete").await,
        Ok(())
    );
    assert_eq!(
        check(env.anonymous(), package.clone(), "read").await,
        Err(AuthzError::AccessDenied)
    );

    assert!(matches!(
        check(env.as_user(env.alice), package, "edit package").await,
        Err(AuthzError::InvalidDirective(_))
    ));

    // No storage representation
    let args = Object::mapping(json!({"projectID": env.package})).unwrap();
    let mut called = false;
    let result = gate::check_permission(&env.as_user(env.admin), &args, "edit", || {
        called = true;
        async { Ok::<_, AuthzError>(()) }
    })
    .await;
    assert!(matches!(result, Err(AuthzError::Internal(_))));
    assert!(!called);
}

/// Fails every request, as if the role tables could not be read.
struct BrokenAuthorizer;

impl Authorizer for BrokenAuthorizer {
    fn authorize_request(&self, _req: &AuthzRequest) -> Result<AuthzResponse> {
        Err(anyhow!("role tables unavailable"))
    }
}

#[tokio::test]
async fn check_permission_authorizer_error() {
    let db = Arc::new(Database::memory().unwrap());
    let shared = AuthzContext::new(db, ModelRegistry::default(), Box::new(BrokenAuthorizer));
    let ctx = RequestContext::with_principal(Arc::new(shared), Principal::new(7));

    let package = Object::typed(
        "Package",
        json!({"id": 1, "name": "fin-utils", "shortDescription": "", "ownerID": 7}),
    )
    .unwrap();

    let mut called = false;
    let result = gate::check_permission(&ctx, &package, "edit", || {
        called = true;
        async { Ok::<_, AuthzError>(()) }
    })
    .await;
    assert!(
        matches!(result, Err(AuthzError::Internal(ref msg)) if msg.contains("role tables unavailable")),
        "unexpected result: {result:?}"
    );
    assert!(!called);
}
