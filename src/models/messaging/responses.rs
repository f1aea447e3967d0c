use serde::Serialize;
use ts_rs::TS;

use super::entities::{Conversation, ConversationSummary, MessageDetail};
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "messaging.ts")]
pub struct ConversationListResponse {
    pub items: Vec<ConversationSummary>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "messaging.ts")]
pub struct ConversationThreadResponse {
    pub conversation: Conversation,
    pub messages: Vec<MessageDetail>,
}
