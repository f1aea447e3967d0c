use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const PREVIEW_LEN: usize = 50;

/// 学员与教务之间的会话，每个学员一个
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "messaging.ts")]
pub struct Conversation {
    pub id: i64,
    pub student_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub last_message_at: chrono::DateTime<chrono::Utc>,
    pub student_read: bool,
    pub admin_read: bool,
}

impl Conversation {
    /// 对调用方而言是否有未读
    pub fn is_unread_for(&self, is_staff: bool) -> bool {
        if is_staff {
            !self.admin_read
        } else {
            !self.student_read
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "messaging.ts")]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_id: Option<i64>,
    pub body: String,
    pub sent_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "messaging.ts")]
pub struct MessageDetail {
    pub message: Message,
    pub sender_name: Option<String>,
    pub is_staff_sender: bool,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "messaging.ts")]
pub struct ConversationSummary {
    pub conversation: Conversation,
    pub student_name: String,
    pub reg_no: Option<String>,
    pub last_message: Option<String>,
    pub unread: bool,
}

/// 会话中发出新消息后双方的已读标记 `(student_read, admin_read)`
pub fn read_flags_after_send(sender_is_staff: bool) -> (bool, bool) {
    if sender_is_staff {
        (false, true)
    } else {
        (true, false)
    }
}

/// 消息预览：超过 50 个字符截断并追加 "..."
pub fn preview(body: &str) -> String {
    if body.chars().count() > PREVIEW_LEN {
        let head: String = body.chars().take(PREVIEW_LEN).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview() {
        assert_eq!(preview("hello"), "hello");
        let long = "a".repeat(60);
        let p = preview(&long);
        assert_eq!(p.len(), 53);
        assert!(p.ends_with("..."));
        assert_eq!(preview(&"é".repeat(50)), "é".repeat(50));
    }

    #[test]
    fn test_read_flags_after_send() {
        assert_eq!(read_flags_after_send(true), (false, true));
        assert_eq!(read_flags_after_send(false), (true, false));
    }
}
