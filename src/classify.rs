//! Row classification: turns a flat run of table rows into grouped fee entries.
//!
//! Banks render grouping differently. HNB marks group rows only through their
//! wording, Seylan through a bold description cell. Each row is first mapped to a
//! [`RowKind`], then a left fold threads the current group label through the scan.

use crate::table::TableRow;
use once_cell::sync::Lazy;
use regex::Regex;

/// Wording that marks a two-cell HNB row as a group label rather than a sub-fee
static GROUP_LABEL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)charges?").unwrap(),
        Regex::new(r"(?i)settlement").unwrap(),
    ]
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    /// Opens a group and carries no fee of its own
    GroupHeader { label: String },
    /// Opens a group and is itself a fee line. `fee_type` is empty unless the
    /// layout names the fee separately from the group.
    GroupHeaderWithValue {
        label: String,
        fee_type: String,
        amount: String,
    },
    /// A fee belonging to the current group
    SubRow { fee_type: String, amount: String },
    /// Free text under the current group, no amount
    Note { text: String },
}

/// Product-less fee line produced by a scan
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeeEntry {
    pub fee_type: String,
    pub description: String,
    pub amount: String,
    pub notes: Option<String>,
}

pub fn is_group_label(text: &str) -> bool {
    GROUP_LABEL_PATTERNS.iter().any(|re| re.is_match(text))
}

/// Classifies a row from the fixed three-column keyword layout.
/// Returns `None` for rows that carry nothing usable.
pub fn classify_keyword_row(cells: &[String]) -> Option<RowKind> {
    if cells.iter().all(|c| c.is_empty()) {
        return None;
    }

    match cells {
        [group, fee_type, amount] => Some(RowKind::GroupHeaderWithValue {
            label: group.clone(),
            fee_type: fee_type.clone(),
            amount: amount.clone(),
        }),
        [label, amount] if is_group_label(label) => Some(RowKind::GroupHeaderWithValue {
            label: label.clone(),
            fee_type: String::new(),
            amount: amount.clone(),
        }),
        [fee_type, amount] => Some(RowKind::SubRow {
            fee_type: fee_type.clone(),
            amount: amount.clone(),
        }),
        [text] => Some(RowKind::Note { text: text.clone() }),
        _ => None,
    }
}

/// Classifies a row from the bold-description layout, where cell 1 holds the label
/// and cell 2 (when present) the amount.
///
/// Only an amount cell that exists and is empty makes a bold row a bare header. A
/// bold row with no amount cell at all is still a fee line, with an empty amount.
pub fn classify_bold_row(row: &TableRow) -> Option<RowKind> {
    let (label, amount_cell) = match row.cells.as_slice() {
        [_, label] => (label.clone(), None),
        [_, label, amount, ..] => (label.clone(), Some(amount.clone())),
        _ => return None,
    };

    Some(match (row.bold_description, amount_cell) {
        (true, Some(amount)) if amount.is_empty() => RowKind::GroupHeader { label },
        (true, amount) => RowKind::GroupHeaderWithValue {
            label,
            fee_type: String::new(),
            amount: amount.unwrap_or_default(),
        },
        (false, amount) => RowKind::SubRow {
            fee_type: label,
            amount: amount.unwrap_or_default(),
        },
    })
}

/// Fold accumulator: the active group label plus everything emitted so far
#[derive(Debug, Default)]
struct GroupScan {
    current_group: String,
    entries: Vec<FeeEntry>,
}

impl GroupScan {
    fn advance(mut self, kind: RowKind) -> Self {
        match kind {
            RowKind::GroupHeader { label } => {
                self.current_group = label;
            }
            RowKind::GroupHeaderWithValue {
                label,
                fee_type,
                amount,
            } => {
                self.current_group = label;
                self.entries.push(FeeEntry {
                    fee_type,
                    description: self.current_group.clone(),
                    amount,
                    notes: None,
                });
            }
            RowKind::SubRow { fee_type, amount } => {
                self.entries.push(FeeEntry {
                    fee_type,
                    description: self.current_group.clone(),
                    amount,
                    notes: None,
                });
            }
            RowKind::Note { text } => {
                self.entries.push(FeeEntry {
                    fee_type: String::new(),
                    description: self.current_group.clone(),
                    amount: String::new(),
                    notes: Some(text),
                });
            }
        }
        self
    }
}

/// Threads the group label through classified rows in order. Each scan starts
/// with an empty group.
pub fn scan<I>(kinds: I) -> Vec<FeeEntry>
where
    I: IntoIterator<Item = RowKind>,
{
    kinds
        .into_iter()
        .fold(GroupScan::default(), GroupScan::advance)
        .entries
}

/// Keyword-layout scan over raw cell rows
pub fn scan_keyword_rows(rows: &[TableRow]) -> Vec<FeeEntry> {
    scan(rows.iter().filter_map(|r| classify_keyword_row(&r.cells)))
}

/// Bold-layout scan over extracted rows
pub fn scan_bold_rows(rows: &[TableRow]) -> Vec<FeeEntry> {
    scan(rows.iter().filter_map(classify_bold_row))
}
