use std::collections::HashMap;

/// One row of the per-page Search Analytics query.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub url: String,
    pub clicks: u64,
    pub impressions: u64,
    pub ctr: f64,
    pub position: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordAggregate {
    pub clicks: u64,
    pub impressions: u64,
    pub ctr: f64,
    pub position: f64,
    /// Contributing pages in API response order, duplicates kept.
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ComparisonEntry {
    pub current_clicks: u64,
    pub current_impressions: u64,
    pub current_ctr: f64,
    pub current_position: f64,
    pub previous_clicks: u64,
    pub previous_impressions: u64,
    pub previous_ctr: f64,
    pub previous_position: f64,
}

/// Insertion-ordered map with an explicit get-or-insert-default accessor.
///
/// Keyword, comparison and trail tables all need first-seen ordering so the
/// report sheets list rows the way the API returned them.
#[derive(Debug, Clone)]
pub struct OrderedTable<V> {
    keys: Vec<String>,
    values: Vec<V>,
    index: HashMap<String, usize>,
}

impl<V> Default for OrderedTable<V> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V> OrderedTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&i| &self.values[i])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Replaces the value for an existing key in place, keeping its position.
    pub fn insert(&mut self, key: String, value: V) {
        match self.index.get(&key) {
            Some(&i) => self.values[i] = value,
            None => {
                self.index.insert(key.clone(), self.keys.len());
                self.keys.push(key);
                self.values.push(value);
            }
        }
    }

    pub fn get_or_insert_default(&mut self, key: &str) -> &mut V
    where
        V: Default,
    {
        let i = match self.index.get(key) {
            Some(&i) => i,
            None => {
                let i = self.keys.len();
                self.index.insert(key.to_string(), i);
                self.keys.push(key.to_string());
                self.values.push(V::default());
                i
            }
        };
        &mut self.values[i]
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.keys.iter().map(String::as_str).zip(self.values.iter())
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.values.iter_mut()
    }
}

pub type KeywordTable = OrderedTable<KeywordAggregate>;
pub type ComparisonTable = OrderedTable<ComparisonEntry>;
pub type TrailCounts = OrderedTable<u32>;

/// Everything the report builder needs from a single run.
#[derive(Debug)]
pub struct AnalysisResult {
    pub site: String,
    pub generated_at: chrono::NaiveDateTime,
    pub comparison: ComparisonTable,
    pub trails: TrailCounts,
    pub keywords: KeywordTable,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_preserves_insertion_order() {
        let mut table: OrderedTable<u32> = OrderedTable::new();
        *table.get_or_insert_default("/shop/") += 1;
        *table.get_or_insert_default("/blog/") += 1;
        *table.get_or_insert_default("/shop/") += 1;

        let entries: Vec<(&str, u32)> = table.iter().map(|(k, v)| (k, *v)).collect();
        assert_eq!(entries, vec![("/shop/", 2), ("/blog/", 1)]);
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut table: OrderedTable<u32> = OrderedTable::new();
        table.insert("a".to_string(), 1);
        table.insert("b".to_string(), 2);
        table.insert("a".to_string(), 3);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("a"), Some(&3));
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_table() {
        let table: ComparisonTable = OrderedTable::new();
        assert!(table.is_empty());
        assert!(table.get("https://example.com/").is_none());
    }
}
