//! Compliance notes derived from a vehicle's brand, model date and engine.
//!
//! Each rule is an independent predicate with a fixed message. Every rule
//! is evaluated; matching messages are returned in the order of [`RULES`].

use crate::data::{Engine, Model};

pub const ECU_UNLOCK_NOTE: &str = "⚠️ ECU unlock required (built after June 2020)";
pub const CPC_UPGRADE_NOTE: &str = "⚠️ CPC upgrade required (M177/M178 2018+)";

/// Vehicle facts a rule may inspect
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub brand_name: &'a str,
    pub model: &'a Model,
    pub engine: &'a Engine,
}

/// A predicate and the note emitted when it holds
pub struct Rule {
    pub name: &'static str,
    pub applies: fn(&RuleInput<'_>) -> bool,
    pub message: &'static str,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("message", &self.message)
            .finish()
    }
}

/// The rule set, in output order
pub const RULES: &[Rule] = &[
    Rule {
        name: "ecu-unlock",
        applies: ecu_unlock_applies,
        message: ECU_UNLOCK_NOTE,
    },
    Rule {
        name: "cpc-upgrade",
        applies: cpc_upgrade_applies,
        message: CPC_UPGRADE_NOTE,
    },
];

fn ecu_unlock_applies(input: &RuleInput<'_>) -> bool {
    requires_ecu_unlock(
        input.brand_name,
        input.model.year,
        input.model.effective_month(),
    )
}

fn cpc_upgrade_applies(input: &RuleInput<'_>) -> bool {
    requires_cpc_upgrade(input.brand_name, &input.engine.name, input.model.year)
}

/// Notes for every rule that applies to this vehicle
pub fn annotate(brand_name: &str, model: &Model, engine: &Engine) -> Vec<String> {
    let input = RuleInput {
        brand_name,
        model,
        engine,
    };
    RULES
        .iter()
        .filter(|rule| (rule.applies)(&input))
        .map(|rule| rule.message.to_string())
        .collect()
}

/// BMWs built June 2020 or later have a locked ECU
pub fn requires_ecu_unlock(brand_name: &str, year: i32, month: u32) -> bool {
    brand_name == "BMW" && (year > 2020 || (year == 2020 && month >= 6))
}

/// Mercedes M177/M178 engines from 2018 on need a CPC upgrade
pub fn requires_cpc_upgrade(brand_name: &str, engine_name: &str, year: i32) -> bool {
    if brand_name != "Mercedes" && brand_name != "Mercedes-Benz" {
        return false;
    }
    let engine = engine_name.to_uppercase();
    (engine.contains("M177") || engine.contains("M178")) && year >= 2018
}
