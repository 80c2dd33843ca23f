//! Commission calculator.
//!
//! Commission is a flat 20% share. For paid projects it is taken on the
//! final revenue and stored; for everything else it is a "potential"
//! figure derived from the budget-range answer.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::answers::StoredAnswer;
use crate::lifecycle::ProjectStatus;
use crate::types::DbId;

/// Commission share in percent.
pub const COMMISSION_RATE_PERCENT: f64 = 20.0;

/// Recognised budget tiers (thousands, amount).
const BUDGET_TIERS: &[(u32, f64)] = &[(5, 5_000.0), (10, 10_000.0), (25, 25_000.0)];

static TIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*k\b").expect("valid regex"));

/// `amount * 20%`.
pub fn commission_on(amount: f64) -> f64 {
    amount * COMMISSION_RATE_PERCENT / 100.0
}

/// Pick the budget-range answer: the first whose prompt mentions "Budget",
/// else the first whose value carries a `$`.
pub fn budget_answer<'a>(answers: &[StoredAnswer<'a>]) -> Option<&'a str> {
    let by_prompt = answers.iter().find(|a| {
        a.prompt
            .is_some_and(|p| p.to_ascii_lowercase().contains("budget"))
    });
    let by_symbol = || {
        answers
            .iter()
            .find(|a| a.value_text.is_some_and(|v| v.contains('$')))
    };
    by_prompt.or_else(by_symbol).and_then(|a| a.value_text)
}

/// Parse a budget label into its base amount.
///
/// Structured values (`["$10k - $25k"]`) use their first element. Only the
/// first `<n>k` token counts; unknown tiers yield `0`.
pub fn parse_budget_tier(label: &str) -> f64 {
    let label = match serde_json::from_str::<serde_json::Value>(label) {
        Ok(serde_json::Value::Array(items)) => match items.into_iter().next() {
            Some(serde_json::Value::String(s)) => s,
            _ => return 0.0,
        },
        Ok(serde_json::Value::String(s)) => s,
        _ => label.to_string(),
    };

    let Some(thousands) = TIER_RE
        .captures(&label)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
    else {
        return 0.0;
    };

    BUDGET_TIERS
        .iter()
        .find(|(k, _)| *k == thousands)
        .map(|(_, amount)| *amount)
        .unwrap_or(0.0)
}

/// Potential commission from a project's answers.
pub fn compute_commission(answers: &[StoredAnswer<'_>]) -> f64 {
    budget_answer(answers)
        .map(parse_budget_tier)
        .map(commission_on)
        .unwrap_or(0.0)
}

/// Commission to report for a project: the stored amount once paid,
/// otherwise the potential commission.
pub fn effective_commission(
    is_paid: bool,
    commission_paid: Option<f64>,
    answers: &[StoredAnswer<'_>],
) -> f64 {
    match (is_paid, commission_paid) {
        (true, Some(stored)) => stored,
        _ => compute_commission(answers),
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionState {
    Potential,
    Earned,
    Cancelled,
}

impl CommissionState {
    pub fn classify(status: ProjectStatus, is_paid: bool) -> Self {
        match (is_paid, status) {
            (true, _) => CommissionState::Earned,
            (false, ProjectStatus::Closed) => CommissionState::Cancelled,
            (false, _) => CommissionState::Potential,
        }
    }
}

/// One project's row on the commission dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct CommissionLine {
    pub project_id: DbId,
    pub project_name: String,
    pub status: ProjectStatus,
    pub state: CommissionState,
    pub amount: f64,
}

impl CommissionLine {
    pub fn new(
        project_id: DbId,
        project_name: String,
        status: ProjectStatus,
        is_paid: bool,
        commission_paid: Option<f64>,
        answers: &[StoredAnswer<'_>],
    ) -> Self {
        let state = CommissionState::classify(status, is_paid);
        let amount = match state {
            CommissionState::Cancelled => 0.0,
            _ => effective_commission(is_paid, commission_paid, answers),
        };
        Self {
            project_id,
            project_name,
            status,
            state,
            amount,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommissionSummary {
    pub potential_total: f64,
    pub earned_total: f64,
    pub potential_count: usize,
    pub earned_count: usize,
    pub cancelled_count: usize,
}

pub fn summarize(lines: &[CommissionLine]) -> CommissionSummary {
    lines.iter().fold(CommissionSummary::default(), |mut acc, line| {
        match line.state {
            CommissionState::Potential => {
                acc.potential_total += line.amount;
                acc.potential_count += 1;
            }
            CommissionState::Earned => {
                acc.earned_total += line.amount;
                acc.earned_count += 1;
            }
            CommissionState::Cancelled => acc.cancelled_count += 1,
        }
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer<'a>(prompt: Option<&'a str>, value: &'a str) -> StoredAnswer<'a> {
        StoredAnswer {
            question_id: "q",
            prompt,
            question_type: None,
            value_text: Some(value),
        }
    }

    #[test]
    fn tiers() {
        assert_eq!(parse_budget_tier("$5k - $10k"), 5_000.0);
        assert_eq!(parse_budget_tier("$10k - $25k"), 10_000.0);
        assert_eq!(parse_budget_tier("$25k+"), 25_000.0);
        assert_eq!(parse_budget_tier("$100k+"), 0.0);
        assert_eq!(parse_budget_tier("Under $1,000"), 0.0);
        assert_eq!(parse_budget_tier(""), 0.0);
    }

    #[test]
    fn structured_budget_uses_first_element() {
        assert_eq!(parse_budget_tier(r#"["$25k+","$5k - $10k"]"#), 25_000.0);
        assert_eq!(parse_budget_tier("[]"), 0.0);
    }

    #[test]
    fn scenario_budget_commission() {
        let answers = [
            answer(Some("Project Name"), "Launch"),
            answer(Some("Budget Range"), "$10k - $25k"),
        ];
        assert_eq!(compute_commission(&answers), 2_000.0);
    }

    #[test]
    fn falls_back_to_currency_symbol() {
        let answers = [answer(None, "Promo"), answer(None, "$5k - $10k")];
        assert_eq!(compute_commission(&answers), 1_000.0);
    }

    #[test]
    fn no_budget_means_zero() {
        assert_eq!(compute_commission(&[answer(None, "hello")]), 0.0);
        assert_eq!(compute_commission(&[]), 0.0);
    }

    #[test]
    fn compute_is_pure() {
        let answers = [answer(Some("Budget"), "$25k+")];
        let first = compute_commission(&answers);
        for _ in 0..5 {
            assert_eq!(compute_commission(&answers), first);
        }
    }

    #[test]
    fn stored_commission_wins_for_paid_projects() {
        let answers = [answer(Some("Budget Range"), "$25k+")];
        assert_eq!(effective_commission(true, Some(3_000.0), &answers), 3_000.0);
        assert_eq!(effective_commission(false, None, &answers), 5_000.0);
        assert_eq!(effective_commission(true, None, &answers), 5_000.0);
    }

    #[test]
    fn mark_paid_rate() {
        assert_eq!(commission_on(15_000.0), 3_000.0);
    }

    #[test]
    fn summary_buckets() {
        let answers = [answer(Some("Budget Range"), "$10k - $25k")];
        let lines = vec![
            CommissionLine::new(DbId::nil(), "a".into(), ProjectStatus::Submitted, false, None, &answers),
            CommissionLine::new(DbId::nil(), "b".into(), ProjectStatus::InProduction, true, Some(3_000.0), &answers),
            CommissionLine::new(DbId::nil(), "c".into(), ProjectStatus::Closed, false, None, &answers),
        ];
        assert_eq!(lines[2].amount, 0.0);

        let s = summarize(&lines);
        assert_eq!(s.potential_total, 2_000.0);
        assert_eq!(s.earned_total, 3_000.0);
        assert_eq!((s.potential_count, s.earned_count, s.cancelled_count), (1, 1, 1));
    }
}
