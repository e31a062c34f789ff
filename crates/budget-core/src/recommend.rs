//! Recommendation engine
//!
//! Threshold rules evaluated against a [`BudgetSnapshot`]. Rules are
//! registered in topic order and the output keeps that order:
//!
//! 1. **Savings rate** - low / good / excellent tier
//! 2. **Retirement contribution** - none / below 15% / 15% and up
//! 3. **Employer match** - using a match, or worth checking for one
//! 4. **Emergency fund** - six months of expenses, with a timeline when saving
//! 5. **Housing cost** - rent or mortgage above 30% of income

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculator::BudgetSnapshot;
use crate::format::{money, percent_value};
use crate::input::ResolvedPercents;

/// Tone of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Warning,
    Info,
    Success,
}

impl RecommendationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Success => "success",
        }
    }
}

impl fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub title: String,
    pub message: String,
}

impl Recommendation {
    pub fn new(
        kind: RecommendationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Identifies a built-in rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleId {
    SavingsRate,
    RetirementContribution,
    EmployerMatch,
    EmergencyFund,
    HousingCost,
}

/// What a rule gets to look at
pub struct RuleContext<'a> {
    pub snapshot: &'a BudgetSnapshot,
    pub percents: ResolvedPercents,
}

/// A single threshold rule. Returns `None` when it has nothing to say.
pub trait Rule: Send + Sync {
    fn id(&self) -> RuleId;

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Recommendation>;
}

/// Months of expenses an emergency fund should cover
pub const EMERGENCY_FUND_MONTHS: f64 = 6.0;

/// Housing share of income above which we warn
pub const HOUSING_RATIO_LIMIT: f64 = 0.30;

pub struct SavingsRateRule;

impl Rule for SavingsRateRule {
    fn id(&self) -> RuleId {
        RuleId::SavingsRate
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Recommendation> {
        let rate = ctx.snapshot.savings_rate;
        let rec = if rate < 10.0 {
            Recommendation::new(
                RecommendationKind::Warning,
                "Low Total Savings Rate",
                format!(
                    "Your current total savings rate (including 401k) is {:.1}%. Consider increasing contributions to reach the recommended 20% savings rate.",
                    rate
                ),
            )
        } else if rate < 20.0 {
            Recommendation::new(
                RecommendationKind::Info,
                "Good Savings Rate",
                format!(
                    "Your total savings rate of {:.1}% is good. Try to reach 20% for optimal financial health.",
                    rate
                ),
            )
        } else {
            Recommendation::new(
                RecommendationKind::Success,
                "Excellent Savings Rate",
                format!(
                    "Your total savings rate of {:.1}% is excellent! You're on track for strong financial growth.",
                    rate
                ),
            )
        };
        Some(rec)
    }
}

pub struct RetirementContributionRule;

impl Rule for RetirementContributionRule {
    fn id(&self) -> RuleId {
        RuleId::RetirementContribution
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Recommendation> {
        let s = ctx.snapshot;
        let contribution = ctx.percents.retirement_contribution_percent;
        let matching = ctx.percents.employer_match_percent;

        if s.monthly_401k_employee == 0.0 {
            return Some(Recommendation::new(
                RecommendationKind::Warning,
                "No 401k Contributions",
                "Consider contributing to a 401k if available. It's a tax-advantaged way to save for retirement and many employers offer matching. Start with 3-5% of your paycheck.",
            ));
        }

        if contribution < 15.0 {
            let mut message = format!(
                "You're currently contributing {}% of your paycheck ({} monthly) to your 401k.",
                percent_value(contribution),
                money(s.monthly_401k_employee)
            );
            if matching > 0.0 {
                message.push_str(&format!(
                    " Your employer matches {}% ({} monthly), giving you a total of {} monthly towards retirement!",
                    percent_value(matching),
                    money(s.monthly_401k_employer),
                    money(s.monthly_401k_total)
                ));
            }
            message.push_str(" Consider gradually increasing to 15-20% for optimal retirement savings.");
            return Some(Recommendation::new(
                RecommendationKind::Info,
                "Consider Increasing 401k",
                message,
            ));
        }

        let mut message = format!(
            "You're contributing {}% of your paycheck ({} monthly) to your 401k.",
            percent_value(contribution),
            money(s.monthly_401k_employee)
        );
        if matching > 0.0 {
            message.push_str(&format!(
                " With your employer's {}% match ({} monthly), your total retirement savings is {} monthly, or {} annually!",
                percent_value(matching),
                money(s.monthly_401k_employer),
                money(s.monthly_401k_total),
                money(s.yearly_401k_total_savings)
            ));
        } else {
            message.push_str(&format!(
                " This equals {} annually towards retirement.",
                money(s.yearly_401k_employee_savings)
            ));
        }
        message.push_str(" Excellent planning!");
        Some(Recommendation::new(
            RecommendationKind::Success,
            "Excellent Retirement Planning",
            message,
        ))
    }
}

pub struct EmployerMatchRule;

impl Rule for EmployerMatchRule {
    fn id(&self) -> RuleId {
        RuleId::EmployerMatch
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Recommendation> {
        let s = ctx.snapshot;
        let matching = ctx.percents.employer_match_percent;

        if matching > 0.0 {
            Some(Recommendation::new(
                RecommendationKind::Success,
                "Great Job Utilizing Employer Match!",
                format!(
                    "You're taking advantage of your employer's {}% 401k match, which adds {} monthly ({} annually) in free money towards your retirement!",
                    percent_value(matching),
                    money(s.monthly_401k_employer),
                    money(s.yearly_401k_employer_savings)
                ),
            ))
        } else if ctx.percents.retirement_contribution_percent > 0.0 {
            Some(Recommendation::new(
                RecommendationKind::Info,
                "Consider Adding Employer Match",
                "If your employer offers 401k matching, make sure you're contributing enough to get the full match - it's free money towards your retirement!",
            ))
        } else {
            None
        }
    }
}

pub struct EmergencyFundRule;

impl Rule for EmergencyFundRule {
    fn id(&self) -> RuleId {
        RuleId::EmergencyFund
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Recommendation> {
        let target = ctx.snapshot.total_expenses * EMERGENCY_FUND_MONTHS;
        let liquid = ctx.snapshot.liquid_savings;

        let mut message = format!(
            "Build an emergency fund of {} (6 months of expenses).",
            money(target)
        );
        // No timeline when nothing is left over each month
        if liquid > 0.0 {
            message.push_str(&format!(
                " At your current liquid savings rate, this would take {:.1} months.",
                target / liquid
            ));
        }

        Some(Recommendation::new(
            RecommendationKind::Info,
            "Emergency Fund Goal",
            message,
        ))
    }
}

pub struct HousingCostRule;

impl Rule for HousingCostRule {
    fn id(&self) -> RuleId {
        RuleId::HousingCost
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Recommendation> {
        let income = ctx.snapshot.monthly_income;
        if income <= 0.0 {
            return None;
        }

        let ratio = ctx.snapshot.expense_breakdown.rent_or_mortgage / income;
        if ratio <= HOUSING_RATIO_LIMIT {
            return None;
        }

        Some(Recommendation::new(
            RecommendationKind::Warning,
            "High Housing Costs",
            format!(
                "Housing costs are {:.1}% of income. Consider reducing to 30% or less.",
                ratio * 100.0
            ),
        ))
    }
}

/// Runs the registered rules in order
pub struct RecommendationEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RecommendationEngine {
    /// Create an engine with the built-in rules in topic order
    pub fn new() -> Self {
        let mut engine = Self { rules: vec![] };

        engine.register(Box::new(SavingsRateRule));
        engine.register(Box::new(RetirementContributionRule));
        engine.register(Box::new(EmployerMatchRule));
        engine.register(Box::new(EmergencyFundRule));
        engine.register(Box::new(HousingCostRule));

        engine
    }

    /// Append a rule; it runs after every rule registered before it
    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn recommend(
        &self,
        snapshot: &BudgetSnapshot,
        percents: ResolvedPercents,
    ) -> Vec<Recommendation> {
        let ctx = RuleContext { snapshot, percents };
        self.rules
            .iter()
            .filter_map(|rule| rule.evaluate(&ctx))
            .collect()
    }

    pub fn rule_ids(&self) -> Vec<RuleId> {
        self.rules.iter().map(|r| r.id()).collect()
    }
}

/// Recommendations from the built-in rules
pub fn recommend(snapshot: &BudgetSnapshot, percents: ResolvedPercents) -> Vec<Recommendation> {
    RecommendationEngine::new().recommend(snapshot, percents)
}
