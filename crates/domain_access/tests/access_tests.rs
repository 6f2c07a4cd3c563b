//! Integration tests for domain_access

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};

use core_kernel::UserId;
use domain_access::forms::check;
use domain_access::{
    navigation_for, quick_actions_for, AuthState, LoginForm, NewUser, Session, TokenClaims, User, UserDirectory,
    UserRole, UserUpdate,
};

fn user(role: UserRole) -> User {
    User {
        id: UserId::new_v7(),
        email: format!("{}@claims.test", role.as_str().to_lowercase()),
        role,
        display_name: role.label().to_string(),
        created_at: Utc::now(),
    }
}

// ============================================================================
// Session Tests
// ============================================================================

mod session_tests {
    use super::*;

    fn signed(claims: &TokenClaims) -> String {
        encode(&Header::default(), claims, &EncodingKey::from_secret(b"server-only")).unwrap()
    }

    #[test]
    fn test_session_round_trips_through_json() {
        let session = Session::new("opaque", user(UserRole::Adjuster));
        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"displayName\""));
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn test_refresh_keeps_user() {
        let now = Utc::now();
        let holder = user(UserRole::Policyholder);
        let stale = Session::new(
            signed(&TokenClaims {
                sub: holder.id.as_uuid().to_string(),
                role: Some(holder.role),
                exp: (now - Duration::minutes(1)).timestamp(),
                iat: None,
                jti: None,
            }),
            holder.clone(),
        );
        assert!(stale.is_expired(now));

        let fresh = stale.with_token(signed(&TokenClaims {
            sub: holder.id.as_uuid().to_string(),
            role: Some(holder.role),
            exp: (now + Duration::hours(8)).timestamp(),
            iat: Some(now.timestamp()),
            jti: Some("refresh-1".to_string()),
        }));
        assert!(!fresh.is_expired(now));
        assert_eq!(fresh.user, holder);
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(TokenClaims::inspect("not.a.jwt").is_err());
    }
}

// ============================================================================
// Navigation Tests
// ============================================================================

mod navigation_tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_every_role_sees_dashboard_first() {
        for role in UserRole::ALL {
            assert_eq!(navigation_for(Some(role))[0].name, "Dashboard");
            assert!(!quick_actions_for(role).is_empty());
        }
    }

    proptest! {
        #[test]
        fn prop_logged_in_menu_extends_anonymous_menu(role in prop::sample::select(UserRole::ALL.to_vec())) {
            let anonymous = navigation_for(None);
            let menu = navigation_for(Some(role));
            for item in anonymous {
                prop_assert!(menu.contains(&item));
            }
            for item in menu {
                prop_assert!(item.roles.is_empty() || item.roles.contains(&role));
            }
        }
    }

    #[test]
    fn test_auth_state_gates_menu() {
        let state = AuthState::from(Some(Session::new("t", user(UserRole::Admin))));
        let names: Vec<&str> = navigation_for(state.role()).iter().map(|i| i.name).collect();
        assert!(names.contains(&"Users"));
        assert!(names.contains(&"Settings"));
    }
}

// ============================================================================
// User Administration Tests
// ============================================================================

mod admin_tests {
    use super::*;

    #[test]
    fn test_new_user_validation() {
        let invalid = NewUser {
            email: "nobody".to_string(),
            role: UserRole::Adjuster,
            display_name: "X".to_string(),
        };
        let errors = check(&invalid).unwrap_err();
        assert_eq!(errors.len(), 2);

        let valid = NewUser {
            email: "new.adjuster@claims.test".to_string(),
            role: UserRole::Adjuster,
            display_name: "New Adjuster".to_string(),
        };
        assert!(check(&valid).is_ok());
    }

    #[test]
    fn test_update_then_filter_directory() {
        let mut directory = UserDirectory::new(UserRole::ALL.iter().map(|r| user(*r)).collect());
        let mut adjuster = directory.filter("", Some(UserRole::Adjuster))[0].clone();

        UserUpdate {
            role: Some(UserRole::Supervisor),
            ..Default::default()
        }
        .apply_to(&mut adjuster);
        directory.upsert(adjuster);

        assert!(directory.filter("", Some(UserRole::Adjuster)).is_empty());
        assert_eq!(directory.filter("", Some(UserRole::Supervisor)).len(), 2);
    }

    #[test]
    fn test_login_form_accepts_valid_credentials() {
        let form = LoginForm {
            email: "policyholder@claims.test".to_string(),
            password: "hunter22".to_string(),
        };
        assert!(check(&form).is_ok());
    }
}
