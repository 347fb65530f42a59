//! Effective-policy resolution.
//!
//! Resolves the one policy that applies to an (org, jurisdiction, instant)
//! triple out of the org's configured policy versions. The fallback chain
//! is an explicit, ordered, total function over an in-memory list, so it is
//! testable without any store: pass constructed policy lists directly.

use tracing::debug;

use crate::models::Policy;

/// Resolves the effective policy for an organization.
///
/// Resolution order, first match wins:
///
/// 1. An active policy for `(org_id, jurisdiction)` with the latest
///    `effective_date` — only attempted when a jurisdiction was supplied.
/// 2. An active org-default policy (`jurisdiction = None`) with the latest
///    `effective_date`.
/// 3. The hard-coded system default ([`Policy::system_default`]).
///
/// This function never fails: the terminal fallback guarantees a result for
/// any input, including an org with zero configured policies. Ties on
/// `effective_date` resolve to the latest entry in list order.
///
/// # Example
///
/// ```
/// use ledger_engine::calculation::resolve_effective_policy;
///
/// // No configured policies at all: the system default applies.
/// let policy = resolve_effective_policy("org_001", Some("us_ca"), &[]);
/// assert_eq!(policy.overtime_threshold_weekly, 2400);
/// assert_eq!(policy.required_days_per_week, 3);
/// ```
pub fn resolve_effective_policy(
    org_id: &str,
    jurisdiction: Option<&str>,
    policies: &[Policy],
) -> Policy {
    let candidates = policies
        .iter()
        .filter(|p| p.is_active && p.org_id == org_id);

    if let Some(code) = jurisdiction
        && let Some(found) = candidates
            .clone()
            .filter(|p| p.jurisdiction.as_deref() == Some(code))
            .max_by_key(|p| p.effective_date)
    {
        debug!(org_id, jurisdiction = code, "resolved jurisdiction policy");
        return found.clone();
    }

    if let Some(found) = candidates
        .filter(|p| p.jurisdiction.is_none())
        .max_by_key(|p| p.effective_date)
    {
        debug!(org_id, "resolved org default policy");
        return found.clone();
    }

    debug!(org_id, "no configured policy, using system default");
    Policy::system_default(org_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn policy(jurisdiction: Option<&str>, effective: &str, weekly: i64) -> Policy {
        Policy {
            jurisdiction: jurisdiction.map(str::to_string),
            effective_date: date(effective),
            overtime_threshold_weekly: weekly,
            ..Policy::system_default("org_001")
        }
    }

    #[test]
    fn test_jurisdiction_policy_preferred_over_default() {
        let policies = vec![
            policy(None, "2025-01-01", 2400),
            policy(Some("us_ca"), "2025-01-01", 2640),
        ];

        let resolved = resolve_effective_policy("org_001", Some("us_ca"), &policies);
        assert_eq!(resolved.overtime_threshold_weekly, 2640);
    }

    #[test]
    fn test_latest_effective_date_wins() {
        let policies = vec![
            policy(Some("us_ca"), "2024-01-01", 2400),
            policy(Some("us_ca"), "2025-06-01", 2640),
            policy(Some("us_ca"), "2025-01-01", 2500),
        ];

        let resolved = resolve_effective_policy("org_001", Some("us_ca"), &policies);
        assert_eq!(resolved.overtime_threshold_weekly, 2640);
    }

    #[test]
    fn test_inactive_policies_are_skipped() {
        let mut inactive = policy(Some("us_ca"), "2025-06-01", 2640);
        inactive.is_active = false;
        let policies = vec![inactive, policy(None, "2024-01-01", 2300)];

        let resolved = resolve_effective_policy("org_001", Some("us_ca"), &policies);
        assert_eq!(resolved.overtime_threshold_weekly, 2300);
    }

    #[test]
    fn test_other_orgs_policies_are_ignored() {
        let mut other = policy(None, "2025-01-01", 9999);
        other.org_id = "org_002".to_string();
        let policies = vec![other];

        let resolved = resolve_effective_policy("org_001", None, &policies);
        assert_eq!(resolved.overtime_threshold_weekly, 2400);
        assert_eq!(resolved.org_id, "org_001");
    }

    #[test]
    fn test_unknown_jurisdiction_falls_back_to_org_default() {
        let policies = vec![policy(None, "2025-01-01", 2300)];

        let resolved = resolve_effective_policy("org_001", Some("us_wa"), &policies);
        assert_eq!(resolved.overtime_threshold_weekly, 2300);
    }

    #[test]
    fn test_no_jurisdiction_supplied_skips_scoped_policies() {
        let policies = vec![
            policy(Some("us_ca"), "2025-01-01", 2640),
            policy(None, "2024-01-01", 2300),
        ];

        let resolved = resolve_effective_policy("org_001", None, &policies);
        assert_eq!(resolved.overtime_threshold_weekly, 2300);
    }

    #[test]
    fn test_empty_policy_list_yields_system_default() {
        let resolved = resolve_effective_policy("org_001", Some("us_ca"), &[]);
        assert_eq!(resolved, Policy::system_default("org_001"));
    }

    #[test]
    fn test_effective_date_tie_resolves_to_later_entry() {
        let policies = vec![
            policy(None, "2025-01-01", 2400),
            policy(None, "2025-01-01", 2520),
        ];

        let resolved = resolve_effective_policy("org_001", None, &policies);
        assert_eq!(resolved.overtime_threshold_weekly, 2520);
    }
}
