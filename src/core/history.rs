use crate::api::HistoryEntry;

/// Which backend answered a stored turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    /// First turn against a document: answered from the sheet itself.
    DataSearch,
    /// Later turns: answered from an internet search.
    InternetSearch,
}

impl TurnKind {
    pub fn from_turn(chat_turn: Option<u32>) -> Option<Self> {
        match chat_turn {
            Some(1) => Some(TurnKind::DataSearch),
            Some(n) if n > 1 => Some(TurnKind::InternetSearch),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TurnKind::DataSearch => "data search",
            TurnKind::InternetSearch => "internet search",
        }
    }
}

/// Label describing what a history entry was asked against.
pub fn context_label(entry: &HistoryEntry) -> String {
    let Some(doc_id) = entry.excel_document_id.as_deref().filter(|id| !id.is_empty()) else {
        return "General context".to_string();
    };
    match TurnKind::from_turn(entry.chat_turn) {
        Some(kind) => format!("Data doc {doc_id} ({})", kind.label()),
        None => format!("Data doc {doc_id}"),
    }
}
