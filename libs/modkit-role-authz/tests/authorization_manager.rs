#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use modkit_claims::{Claim, claim_types};
use modkit_role_authz::{
    AuthorizationManager, AuthzConfig, AuthzError, CallSite, ExecutionContext, MarkerRegistry,
    MemberDescriptor, ResourceType, RoleAuthorizationManager, SecuredResource, authorize,
    call_site, register_resource,
};

struct Console;

impl SecuredResource for Console {
    const RESOURCE_TYPE: ResourceType = ResourceType {
        name: "it.console",
        members: &[
            MemberDescriptor::guarded("resource1", "admin"),
            MemberDescriptor::guarded("resource2", "user"),
            MemberDescriptor::open("banner"),
        ],
    };
}

register_resource!(Console);

authorize!(can_accept_permission => "admin");
authorize!(can_refuse_permission => "user");

fn can_accept_permission(authz: &dyn AuthorizationManager, ctx: &ExecutionContext) -> bool {
    authz.check_permission(ctx, &call_site!())
}

fn can_refuse_permission(authz: &dyn AuthorizationManager, ctx: &ExecutionContext) -> bool {
    authz.check_permission(ctx, &call_site!())
}

struct Reports {
    authz: RoleAuthorizationManager,
}

impl Reports {
    fn export(&self, ctx: &ExecutionContext) -> bool {
        self.authz.check_permission(ctx, &call_site!())
    }
}

struct Batch<T> {
    authz: RoleAuthorizationManager,
    jobs: Vec<T>,
}

impl<T> Batch<T> {
    fn run(&mut self, ctx: &ExecutionContext) -> bool {
        if !self.authz.check_permission(ctx, &call_site!()) {
            return false;
        }
        self.jobs.clear();
        true
    }
}

trait Purge {
    fn purge(&self, ctx: &ExecutionContext) -> bool;
}

impl Purge for Reports {
    fn purge(&self, ctx: &ExecutionContext) -> bool {
        self.authz.check_permission(ctx, &call_site!())
    }
}

authorize!(Reports::export => "admin");
authorize!(Batch::run => "admin");
authorize!(Reports::purge => "user");

fn admin_context() -> ExecutionContext {
    ExecutionContext::establish(
        [
            Claim::new(claim_types::NAME, "Adi").unwrap(),
            Claim::new(claim_types::ROLE, "admin").unwrap(),
            Claim::new(claim_types::MOBILE_PHONE, "088778").unwrap(),
        ],
        "password",
    )
    .unwrap()
}

#[test]
fn established_context_carries_the_principal() {
    let ctx = admin_context();

    assert!(ctx.is_authenticated());
    let principal = ctx.principal().unwrap();
    assert_eq!(principal.name(), Some("Adi"));
    assert!(
        principal
            .has_claim(claim_types::MOBILE_PHONE, "088778")
            .unwrap()
    );
}

#[test]
fn establish_rejects_empty_authentication_type() {
    let result = ExecutionContext::establish([Claim::new(claim_types::NAME, "Adi").unwrap()], "");
    assert!(result.is_err());
}

#[test]
fn check_permission_follows_method_markers() {
    let authz = RoleAuthorizationManager::from_static();
    let ctx = admin_context();

    assert!(can_accept_permission(&authz, &ctx));
    assert!(!can_refuse_permission(&authz, &ctx));
    assert!(!can_accept_permission(&authz, &ExecutionContext::anonymous()));
}

#[test]
fn has_permission_follows_member_markers() {
    let authz = RoleAuthorizationManager::from_static();
    let ctx = admin_context();

    assert!(authz.has_permission(&ctx, "it.console", "resource1").unwrap());
    assert!(!authz.has_permission(&ctx, "it.console", "resource2").unwrap());
    assert!(!authz.has_permission(&ctx, "it.console", "banner").unwrap());

    assert!(authz.has_permission_for::<Console>(&ctx, "resource1").unwrap());
    assert!(!authz.has_permission_for::<Console>(&ctx, "resource2").unwrap());
}

#[test]
fn has_permission_reports_unknown_members() {
    let authz = RoleAuthorizationManager::from_static();
    let ctx = admin_context();

    let err = authz
        .has_permission(&ctx, "it.console", "resource3")
        .unwrap_err();
    assert!(err.is_lookup_failure());
    assert!(matches!(err, AuthzError::MemberNotFound { .. }));
}

#[test]
fn is_in_role_checks_the_context_principal() {
    let authz = RoleAuthorizationManager::from_static();
    let ctx = admin_context();

    assert!(authz.is_in_role(&ctx, "admin").unwrap());
    assert!(!authz.is_in_role(&ctx, "user").unwrap());
}

#[test]
fn method_markers_cover_inherent_generic_and_trait_impls() {
    let ctx = admin_context();
    let reports = Reports {
        authz: RoleAuthorizationManager::from_static(),
    };
    let mut batch = Batch {
        authz: RoleAuthorizationManager::from_static(),
        jobs: vec!["rebuild-index"],
    };

    assert!(reports.export(&ctx));
    assert!(batch.run(&ctx));
    assert!(batch.jobs.is_empty());
    assert!(!reports.purge(&ctx));
}

#[test]
fn contexts_are_independent_across_threads() {
    let authz: Arc<dyn AuthorizationManager> = Arc::new(RoleAuthorizationManager::from_static());

    let handles: Vec<_> = ["admin", "user"]
        .into_iter()
        .map(|role| {
            let authz = Arc::clone(&authz);
            std::thread::spawn(move || {
                let ctx = ExecutionContext::establish(
                    [Claim::new(claim_types::ROLE, role).unwrap()],
                    "password",
                )
                .unwrap();
                (
                    can_accept_permission(authz.as_ref(), &ctx),
                    can_refuse_permission(authz.as_ref(), &ctx),
                )
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![(true, false), (false, true)]);
}

#[test]
fn configured_markers_extend_and_override_static_ones() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("authz.yaml");
    let accept_site = CallSite::new(concat!(module_path!(), "::can_accept_permission"));
    std::fs::write(
        &path,
        format!(
            r#"
methods:
  - call_site: "{accept_site}"
    roles: "operator"
resources:
  - name: "it.reports"
    members:
      - name: "export"
        roles: "admin,auditor"
"#
        ),
    )
    .unwrap();

    let cfg = AuthzConfig::load(&path).unwrap();
    let authz = RoleAuthorizationManager::new(Arc::new(MarkerRegistry::from_config(&cfg).unwrap()));
    let ctx = admin_context();

    assert!(!can_accept_permission(&authz, &ctx));
    assert!(authz.has_permission(&ctx, "it.reports", "export").unwrap());
    assert!(authz.has_permission(&ctx, "it.console", "resource1").unwrap());
}

#[test]
fn typed_and_untyped_checks_agree_after_member_override() {
    let cfg = AuthzConfig::from_yaml_str(
        r#"
resources:
  - name: "it.console"
    members:
      - name: "resource2"
        roles: "admin"
"#,
    )
    .unwrap();
    let authz = RoleAuthorizationManager::new(Arc::new(MarkerRegistry::from_config(&cfg).unwrap()));
    let ctx = admin_context();

    for member in ["resource1", "resource2", "banner"] {
        assert_eq!(
            authz.has_permission(&ctx, "it.console", member).unwrap(),
            authz.has_permission_for::<Console>(&ctx, member).unwrap(),
            "typed and untyped checks disagree on {member}"
        );
    }
    assert!(authz.has_permission(&ctx, "it.console", "resource1").unwrap());
    assert!(authz.has_permission_for::<Console>(&ctx, "resource2").unwrap());
    assert!(!authz.has_permission_for::<Console>(&ctx, "banner").unwrap());
}
