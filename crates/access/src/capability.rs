use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single named permission a role may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    CanViewJobs,
    CanManageJobs,
    CanCreateEstimates,
    CanManageInvoices,
    CanViewFinancials,
    CanViewPayroll,
    CanEditEmployees,
    CanManageSchedule,
    CanManageFleet,
    CanTrackTime,
    CanCompleteSafetyChecklists,
    CanViewReports,
    CanManageSettings,
}

impl Capability {
    pub const ALL: [Capability; 13] = [
        Capability::CanViewJobs,
        Capability::CanManageJobs,
        Capability::CanCreateEstimates,
        Capability::CanManageInvoices,
        Capability::CanViewFinancials,
        Capability::CanViewPayroll,
        Capability::CanEditEmployees,
        Capability::CanManageSchedule,
        Capability::CanManageFleet,
        Capability::CanTrackTime,
        Capability::CanCompleteSafetyChecklists,
        Capability::CanViewReports,
        Capability::CanManageSettings,
    ];

    /// External (camelCase) name, e.g. `canManageFleet`.
    pub fn name(&self) -> &'static str {
        match self {
            Capability::CanViewJobs => "canViewJobs",
            Capability::CanManageJobs => "canManageJobs",
            Capability::CanCreateEstimates => "canCreateEstimates",
            Capability::CanManageInvoices => "canManageInvoices",
            Capability::CanViewFinancials => "canViewFinancials",
            Capability::CanViewPayroll => "canViewPayroll",
            Capability::CanEditEmployees => "canEditEmployees",
            Capability::CanManageSchedule => "canManageSchedule",
            Capability::CanManageFleet => "canManageFleet",
            Capability::CanTrackTime => "canTrackTime",
            Capability::CanCompleteSafetyChecklists => "canCompleteSafetyChecklists",
            Capability::CanViewReports => "canViewReports",
            Capability::CanManageSettings => "canManageSettings",
        }
    }

    /// Field name used in permission table files, e.g. `can_manage_fleet`.
    pub fn field_name(&self) -> &'static str {
        match self {
            Capability::CanViewJobs => "can_view_jobs",
            Capability::CanManageJobs => "can_manage_jobs",
            Capability::CanCreateEstimates => "can_create_estimates",
            Capability::CanManageInvoices => "can_manage_invoices",
            Capability::CanViewFinancials => "can_view_financials",
            Capability::CanViewPayroll => "can_view_payroll",
            Capability::CanEditEmployees => "can_edit_employees",
            Capability::CanManageSchedule => "can_manage_schedule",
            Capability::CanManageFleet => "can_manage_fleet",
            Capability::CanTrackTime => "can_track_time",
            Capability::CanCompleteSafetyChecklists => "can_complete_safety_checklists",
            Capability::CanViewReports => "can_view_reports",
            Capability::CanManageSettings => "can_manage_settings",
        }
    }
}

impl FromStr for Capability {
    type Err = Error;

    /// Accepts either the camelCase or the snake_case name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Capability::ALL
            .into_iter()
            .find(|c| c.name() == name || c.field_name() == name)
            .ok_or_else(|| Error::UnknownCapability(s.to_string()))
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
