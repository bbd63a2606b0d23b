use serde::Serialize;
use std::collections::HashMap;

/// Everything needed to map result-set column labels back to logical keys.
///
/// Built while rendering the projection of a result-mapped read.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultMapping {
    /// Source-script alias → logical entity name (`o` → `order`)
    pub alias_map: HashMap<String, String>,
    /// Logical result key → rendered column (`o.userId` → `o.user_id`)
    pub property_mapping: HashMap<String, String>,
    /// Generated column alias → what it stands for
    /// (`c0` → `o.user_id`, `amount_sum` → `amount_sum`, `o$amount_sum` → `o.amount_sum`)
    pub result_key_alias_map: HashMap<String, String>,
}

impl ResultMapping {
    /// Logical key for a column label of the result set
    pub fn property_for_label(&self, label: &str) -> String {
        let target = self
            .result_key_alias_map
            .get(label)
            .map(String::as_str)
            .unwrap_or(label);

        self.property_mapping
            .iter()
            .find(|(_, column)| column.as_str() == target)
            .map(|(key, _)| key.clone())
            .unwrap_or_else(|| target.to_string())
    }
}
