//! The administrator capability set used for grants and revocations.
//!
//! Telegram models channel permissions as independently-toggleable flags on
//! `promoteChatMember`. A member promoted with every flag false is demoted
//! back to a regular member, which is how revocation works here.

use serde::Serialize;

/// The ten toggleable administrator permissions.
///
/// Every field is always serialized, so a revocation explicitly clears each
/// flag rather than leaving any at its previous value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdminRights {
    pub can_change_info: bool,
    pub can_post_messages: bool,
    pub can_edit_messages: bool,
    pub can_delete_messages: bool,
    pub can_invite_users: bool,
    pub can_restrict_members: bool,
    pub can_pin_messages: bool,
    pub can_promote_members: bool,
    pub can_manage_chat: bool,
    pub can_manage_voice_chats: bool,
}

impl AdminRights {
    /// No permissions at all. Promoting with this set demotes the member.
    pub fn none() -> Self {
        Self {
            can_change_info: false,
            can_post_messages: false,
            can_edit_messages: false,
            can_delete_messages: false,
            can_invite_users: false,
            can_restrict_members: false,
            can_pin_messages: false,
            can_promote_members: false,
            can_manage_chat: false,
            can_manage_voice_chats: false,
        }
    }

    /// The minimal grant: posting only, every other permission withheld.
    pub fn post_only() -> Self {
        Self {
            can_post_messages: true,
            ..Self::none()
        }
    }
}
