//! Role-based navigation and dashboard quick actions

use serde::Serialize;

use crate::user::UserRole;

/// An entry in the application menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub name: &'static str,
    pub href: &'static str,
    /// Empty means every role may see it
    pub roles: &'static [UserRole],
}

impl NavItem {
    /// Returns true if the role (or an anonymous visitor) may see this item
    pub fn visible_to(&self, role: Option<UserRole>) -> bool {
        if self.roles.is_empty() {
            return true;
        }
        role.is_some_and(|r| self.roles.contains(&r))
    }
}

static MENU: [NavItem; 8] = [
    NavItem { name: "Dashboard", href: "/", roles: &[] },
    NavItem { name: "My Claims", href: "/claims", roles: &[] },
    NavItem { name: "New Claim", href: "/claims/new", roles: &[UserRole::Policyholder] },
    NavItem {
        name: "Workbench",
        href: "/workbench",
        roles: &[UserRole::Adjuster, UserRole::Supervisor],
    },
    NavItem {
        name: "All Claims",
        href: "/admin/claims",
        roles: &[UserRole::Supervisor, UserRole::Admin],
    },
    NavItem { name: "Users", href: "/admin/users", roles: &[UserRole::Admin] },
    NavItem {
        name: "Reports",
        href: "/reports",
        roles: &[UserRole::Supervisor, UserRole::Admin],
    },
    NavItem { name: "Settings", href: "/settings", roles: &[UserRole::Admin] },
];

/// Menu entries visible to the role, in menu order
pub fn navigation_for(role: Option<UserRole>) -> Vec<&'static NavItem> {
    MENU.iter().filter(|item| item.visible_to(role)).collect()
}

/// Shortcut offered on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuickAction {
    SubmitNewClaim,
    ViewMyClaims,
    OpenWorkbench,
    ViewReports,
}

impl QuickAction {
    pub fn label(&self) -> &'static str {
        match self {
            QuickAction::SubmitNewClaim => "Submit New Claim",
            QuickAction::ViewMyClaims => "View My Claims",
            QuickAction::OpenWorkbench => "Open Workbench",
            QuickAction::ViewReports => "View Reports",
        }
    }
}

/// Dashboard shortcuts for a role
pub fn quick_actions_for(role: UserRole) -> Vec<QuickAction> {
    let mut actions = Vec::new();
    if role == UserRole::Policyholder {
        actions.push(QuickAction::SubmitNewClaim);
    }
    actions.push(QuickAction::ViewMyClaims);
    if matches!(role, UserRole::Adjuster | UserRole::Supervisor) {
        actions.push(QuickAction::OpenWorkbench);
    }
    if role.is_supervisory() {
        actions.push(QuickAction::ViewReports);
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(role: Option<UserRole>) -> Vec<&'static str> {
        navigation_for(role).into_iter().map(|item| item.name).collect()
    }

    #[test]
    fn test_policyholder_menu() {
        assert_eq!(names(Some(UserRole::Policyholder)), vec!["Dashboard", "My Claims", "New Claim"]);
    }

    #[test]
    fn test_supervisor_menu() {
        assert_eq!(
            names(Some(UserRole::Supervisor)),
            vec!["Dashboard", "My Claims", "Workbench", "All Claims", "Reports"]
        );
    }

    #[test]
    fn test_admin_menu_has_no_workbench() {
        let admin = names(Some(UserRole::Admin));
        assert!(!admin.contains(&"Workbench"));
        assert!(admin.contains(&"Users"));
        assert!(admin.contains(&"Settings"));
    }

    #[test]
    fn test_anonymous_sees_only_unrestricted_items() {
        assert_eq!(names(None), vec!["Dashboard", "My Claims"]);
    }

    #[test]
    fn test_quick_actions() {
        assert_eq!(
            quick_actions_for(UserRole::Policyholder),
            vec![QuickAction::SubmitNewClaim, QuickAction::ViewMyClaims]
        );
        assert_eq!(
            quick_actions_for(UserRole::Supervisor),
            vec![QuickAction::ViewMyClaims, QuickAction::OpenWorkbench, QuickAction::ViewReports]
        );
    }
}
