//! Permission sets and the role → permission table.

use crate::{Capability, Error, Result, Role};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The capability flags held by one role.
///
/// Every flag is a plain `bool`; a table file that omits one is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PermissionSet {
    pub can_view_jobs: bool,
    pub can_manage_jobs: bool,
    pub can_create_estimates: bool,
    pub can_manage_invoices: bool,
    pub can_view_financials: bool,
    pub can_view_payroll: bool,
    pub can_edit_employees: bool,
    pub can_manage_schedule: bool,
    pub can_manage_fleet: bool,
    pub can_track_time: bool,
    pub can_complete_safety_checklists: bool,
    pub can_view_reports: bool,
    pub can_manage_settings: bool,
}

impl PermissionSet {
    /// A set with every flag cleared.
    pub const fn none() -> Self {
        Self {
            can_view_jobs: false,
            can_manage_jobs: false,
            can_create_estimates: false,
            can_manage_invoices: false,
            can_view_financials: false,
            can_view_payroll: false,
            can_edit_employees: false,
            can_manage_schedule: false,
            can_manage_fleet: false,
            can_track_time: false,
            can_complete_safety_checklists: false,
            can_view_reports: false,
            can_manage_settings: false,
        }
    }

    /// A set with every flag raised.
    pub const fn all() -> Self {
        Self {
            can_view_jobs: true,
            can_manage_jobs: true,
            can_create_estimates: true,
            can_manage_invoices: true,
            can_view_financials: true,
            can_view_payroll: true,
            can_edit_employees: true,
            can_manage_schedule: true,
            can_manage_fleet: true,
            can_track_time: true,
            can_complete_safety_checklists: true,
            can_view_reports: true,
            can_manage_settings: true,
        }
    }

    /// Whether the set holds `capability`.
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::CanViewJobs => self.can_view_jobs,
            Capability::CanManageJobs => self.can_manage_jobs,
            Capability::CanCreateEstimates => self.can_create_estimates,
            Capability::CanManageInvoices => self.can_manage_invoices,
            Capability::CanViewFinancials => self.can_view_financials,
            Capability::CanViewPayroll => self.can_view_payroll,
            Capability::CanEditEmployees => self.can_edit_employees,
            Capability::CanManageSchedule => self.can_manage_schedule,
            Capability::CanManageFleet => self.can_manage_fleet,
            Capability::CanTrackTime => self.can_track_time,
            Capability::CanCompleteSafetyChecklists => self.can_complete_safety_checklists,
            Capability::CanViewReports => self.can_view_reports,
            Capability::CanManageSettings => self.can_manage_settings,
        }
    }

    /// Capabilities held by this set, in [`Capability::ALL`] order.
    pub fn granted(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL.into_iter().filter(|c| self.allows(*c))
    }
}

/// One [`PermissionSet`] per [`Role`].
///
/// A struct field per role keeps the mapping total: there is no way to build
/// a table that leaves a role out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PermissionTable {
    pub admin: PermissionSet,
    pub manager: PermissionSet,
    pub operator: PermissionSet,
    pub employee: PermissionSet,
    pub accountant: PermissionSet,
    pub hr: PermissionSet,
}

const MANAGER: PermissionSet = PermissionSet {
    can_view_payroll: false,
    can_manage_settings: false,
    ..PermissionSet::all()
};

const OPERATOR: PermissionSet = PermissionSet {
    can_view_jobs: true,
    can_manage_fleet: true,
    can_track_time: true,
    can_complete_safety_checklists: true,
    ..PermissionSet::none()
};

const EMPLOYEE: PermissionSet = PermissionSet {
    can_view_jobs: true,
    can_track_time: true,
    can_complete_safety_checklists: true,
    ..PermissionSet::none()
};

const ACCOUNTANT: PermissionSet = PermissionSet {
    can_view_jobs: true,
    can_create_estimates: true,
    can_manage_invoices: true,
    can_view_financials: true,
    can_view_payroll: true,
    can_track_time: true,
    can_view_reports: true,
    ..PermissionSet::none()
};

const HR: PermissionSet = PermissionSet {
    can_view_jobs: true,
    can_view_payroll: true,
    can_edit_employees: true,
    can_manage_schedule: true,
    can_track_time: true,
    can_view_reports: true,
    ..PermissionSet::none()
};

impl PermissionTable {
    /// The table compiled into the binary.
    pub const BUILTIN: PermissionTable = PermissionTable {
        admin: PermissionSet::all(),
        manager: MANAGER,
        operator: OPERATOR,
        employee: EMPLOYEE,
        accountant: ACCOUNTANT,
        hr: HR,
    };

    /// The builtin table.
    pub fn builtin() -> Self {
        Self::BUILTIN
    }

    /// Load a permission table from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse a permission table from a TOML string.
    ///
    /// Every role and every flag must be present.
    pub fn parse(toml: &str) -> Result<Self> {
        toml::from_str(toml).map_err(|e| Error::Parse(e.to_string()))
    }

    /// The permission set for `role`.
    pub fn get(&self, role: Role) -> &PermissionSet {
        match role {
            Role::Admin => &self.admin,
            Role::Manager => &self.manager,
            Role::Operator => &self.operator,
            Role::Employee => &self.employee,
            Role::Accountant => &self.accountant,
            Role::Hr => &self.hr,
        }
    }

    /// Render the table as TOML, e.g. as a starting point for a custom table.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::Parse(e.to_string()))
    }
}

impl Default for PermissionTable {
    fn default() -> Self {
        Self::BUILTIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_scenarios() {
        let table = PermissionTable::builtin();
        assert!(table.get(Role::Admin).allows(Capability::CanManageSettings));
        assert!(!table.get(Role::Employee).allows(Capability::CanManageSettings));
        assert!(table.get(Role::Accountant).allows(Capability::CanViewPayroll));
        assert!(!table.get(Role::Accountant).allows(Capability::CanManageFleet));
    }

    #[test]
    fn test_default_role_is_least_privileged() {
        let table = PermissionTable::builtin();
        let default_count = table.get(Role::DEFAULT).granted().count();
        for role in Role::ALL {
            assert!(
                table.get(role).granted().count() >= default_count,
                "{role} holds fewer capabilities than the default role"
            );
        }
    }

    #[test]
    fn test_admin_holds_everything() {
        let table = PermissionTable::builtin();
        assert_eq!(table.get(Role::Admin).granted().count(), Capability::ALL.len());
    }

    #[test]
    fn test_granted_in_declaration_order() {
        let granted: Vec<_> = PermissionTable::builtin()
            .get(Role::Employee)
            .granted()
            .collect();
        assert_eq!(
            granted,
            vec![
                Capability::CanViewJobs,
                Capability::CanTrackTime,
                Capability::CanCompleteSafetyChecklists,
            ]
        );
    }

    #[test]
    fn test_toml_round_trip() {
        let toml = PermissionTable::builtin().to_toml().unwrap();
        let parsed = PermissionTable::parse(&toml).unwrap();
        assert_eq!(parsed, PermissionTable::builtin());
    }

    #[test]
    fn test_parse_rejects_missing_role() {
        let mut toml = PermissionTable::builtin().to_toml().unwrap();
        let start = toml.find("[hr]").unwrap();
        toml.truncate(start);
        let err = PermissionTable::parse(&toml).unwrap_err();
        assert!(matches!(err, Error::Parse(ref msg) if msg.contains("hr")));
    }

    #[test]
    fn test_parse_rejects_missing_flag() {
        let toml = PermissionTable::builtin().to_toml().unwrap();
        let toml = toml.replacen("can_manage_settings = true\n", "", 1);
        assert!(PermissionTable::parse(&toml).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_flag() {
        let toml = PermissionTable::builtin().to_toml().unwrap();
        let toml = toml.replacen("[admin]\n", "[admin]\ncan_fly_drones = true\n", 1);
        let err = PermissionTable::parse(&toml).unwrap_err();
        assert!(matches!(err, Error::Parse(ref msg) if msg.contains("can_fly_drones")));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("permissions.toml");
        let mut table = PermissionTable::builtin();
        table.operator.can_view_reports = true;
        std::fs::write(&path, table.to_toml().unwrap()).unwrap();

        let loaded = PermissionTable::load(&path).unwrap();
        assert!(loaded.get(Role::Operator).allows(Capability::CanViewReports));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PermissionTable::load(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
