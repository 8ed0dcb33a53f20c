use crate::{Capability, Error, PermissionSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A dashboard panel. Opening one requires a single capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    Dashboard,
    Jobs,
    Estimates,
    Invoices,
    Financials,
    Fleet,
    Scheduling,
    TimeTracking,
    Safety,
    Employees,
    Payroll,
    Reports,
    Settings,
}

impl Panel {
    /// Every panel, in navigation order.
    pub const ALL: [Panel; 13] = [
        Panel::Dashboard,
        Panel::Jobs,
        Panel::Estimates,
        Panel::Invoices,
        Panel::Financials,
        Panel::Fleet,
        Panel::Scheduling,
        Panel::TimeTracking,
        Panel::Safety,
        Panel::Employees,
        Panel::Payroll,
        Panel::Reports,
        Panel::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Panel::Dashboard => "dashboard",
            Panel::Jobs => "jobs",
            Panel::Estimates => "estimates",
            Panel::Invoices => "invoices",
            Panel::Financials => "financials",
            Panel::Fleet => "fleet",
            Panel::Scheduling => "scheduling",
            Panel::TimeTracking => "time_tracking",
            Panel::Safety => "safety",
            Panel::Employees => "employees",
            Panel::Payroll => "payroll",
            Panel::Reports => "reports",
            Panel::Settings => "settings",
        }
    }

    /// The capability needed to open this panel.
    pub fn required_capability(&self) -> Capability {
        match self {
            Panel::Dashboard | Panel::Jobs => Capability::CanViewJobs,
            Panel::Estimates => Capability::CanCreateEstimates,
            Panel::Invoices => Capability::CanManageInvoices,
            Panel::Financials => Capability::CanViewFinancials,
            Panel::Fleet => Capability::CanManageFleet,
            Panel::Scheduling => Capability::CanManageSchedule,
            Panel::TimeTracking => Capability::CanTrackTime,
            Panel::Safety => Capability::CanCompleteSafetyChecklists,
            Panel::Employees => Capability::CanEditEmployees,
            Panel::Payroll => Capability::CanViewPayroll,
            Panel::Reports => Capability::CanViewReports,
            Panel::Settings => Capability::CanManageSettings,
        }
    }
}

impl PermissionSet {
    /// Whether this set may open `panel`.
    pub fn can_open(&self, panel: Panel) -> bool {
        self.allows(panel.required_capability())
    }
}

impl FromStr for Panel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().replace('-', "_");
        Panel::ALL
            .into_iter()
            .find(|panel| panel.as_str().eq_ignore_ascii_case(&name))
            .ok_or_else(|| Error::UnknownPanel(s.to_string()))
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PermissionTable, Role};

    #[test]
    fn test_parse_accepts_hyphens() {
        assert_eq!("time-tracking".parse::<Panel>().unwrap(), Panel::TimeTracking);
        assert_eq!("Fleet".parse::<Panel>().unwrap(), Panel::Fleet);
        assert!("drone_imagery".parse::<Panel>().is_err());
    }

    #[test]
    fn test_settings_only_for_admin() {
        let table = PermissionTable::builtin();
        for role in Role::ALL {
            assert_eq!(
                table.get(role).can_open(Panel::Settings),
                role == Role::Admin,
                "{role}"
            );
        }
    }

    #[test]
    fn test_everyone_sees_dashboard() {
        let table = PermissionTable::builtin();
        assert!(Role::ALL.iter().all(|r| table.get(*r).can_open(Panel::Dashboard)));
    }
}
