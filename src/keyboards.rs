use std::str::FromStr;

use crate::messaging::{InlineButton, Keyboard};

pub const APPLY: &str = "Оформить заявку";
pub const CONTACT: &str = "Связаться с менеджером/дизайнером";
pub const ADMIN_PANEL: &str = "Админ-панель";
pub const STATISTICS: &str = "📊 Статистика";
pub const BROADCAST: &str = "📨 Рассылка";
pub const APPLICATIONS: &str = "📋 Все заявки";
pub const INACTIVE_USERS: &str = "👥 Все пользователи";
pub const DELETE_APPLICATION: &str = "🗑️ Удалить заявку";
pub const BACK: &str = "Назад";

/// A reply-keyboard button recognised by its exact label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Apply,
    Contact,
    AdminPanel,
    Statistics,
    Broadcast,
    Applications,
    InactiveUsers,
    DeleteApplication,
    Back,
}

impl MenuCommand {
    pub fn parse(text: &str) -> Option<Self> {
        let command = match text {
            APPLY => MenuCommand::Apply,
            CONTACT => MenuCommand::Contact,
            ADMIN_PANEL => MenuCommand::AdminPanel,
            STATISTICS => MenuCommand::Statistics,
            BROADCAST => MenuCommand::Broadcast,
            APPLICATIONS => MenuCommand::Applications,
            INACTIVE_USERS => MenuCommand::InactiveUsers,
            DELETE_APPLICATION => MenuCommand::DeleteApplication,
            BACK => MenuCommand::Back,
            _ => return None,
        };
        Some(command)
    }

    pub fn admin_only(self) -> bool {
        !matches!(self, MenuCommand::Apply | MenuCommand::Contact | MenuCommand::Back)
    }
}

/// Inline button payloads, `<action>_<applicationId>` or `cancel_broadcast`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    CancelBroadcast,
    Reply(i32),
    Complete(i32),
    Delete(i32),
}

impl FromStr for CallbackAction {
    type Err = String;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        if data == "cancel_broadcast" {
            return Ok(CallbackAction::CancelBroadcast);
        }
        let (action, id) = data
            .split_once('_')
            .ok_or_else(|| format!("malformed callback data {:?}", data))?;
        let id: i32 = id
            .parse()
            .map_err(|_| format!("bad application id in {:?}", data))?;
        match action {
            "reply" => Ok(CallbackAction::Reply(id)),
            "complete" => Ok(CallbackAction::Complete(id)),
            "delete" => Ok(CallbackAction::Delete(id)),
            other => Err(format!("unknown callback action {:?}", other)),
        }
    }
}

pub fn get_main_keyboard(is_admin: bool) -> Keyboard {
    let mut keyboard: Vec<Vec<String>> = vec![];

    keyboard.push(vec![APPLY.to_string()]);
    keyboard.push(vec![CONTACT.to_string()]);
    if is_admin {
        keyboard.push(vec![ADMIN_PANEL.to_string()]);
    }

    Keyboard::Menu(keyboard)
}

pub fn get_admin_keyboard() -> Keyboard {
    Keyboard::Menu(vec![
        vec![STATISTICS.to_string(), BROADCAST.to_string()],
        vec![APPLICATIONS.to_string(), INACTIVE_USERS.to_string()],
        vec![DELETE_APPLICATION.to_string()],
        vec![BACK.to_string()],
    ])
}

pub fn get_application_keyboard(application_id: i32) -> Keyboard {
    Keyboard::Inline(vec![
        vec![
            InlineButton::new("💬 Ответить", format!("reply_{}", application_id)),
            InlineButton::new("✅ Завершить", format!("complete_{}", application_id)),
        ],
        vec![InlineButton::new("🗑️ Удалить", format!("delete_{}", application_id))],
    ])
}

pub fn get_cancel_broadcast_keyboard() -> Keyboard {
    Keyboard::Inline(vec![vec![InlineButton::new(
        "❌ Отменить рассылку",
        "cancel_broadcast",
    )]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_application_actions() {
        assert_eq!("reply_7".parse::<CallbackAction>(), Ok(CallbackAction::Reply(7)));
        assert_eq!("complete_12".parse::<CallbackAction>(), Ok(CallbackAction::Complete(12)));
        assert_eq!("delete_3".parse::<CallbackAction>(), Ok(CallbackAction::Delete(3)));
        assert_eq!("cancel_broadcast".parse::<CallbackAction>(), Ok(CallbackAction::CancelBroadcast));
    }

    #[test]
    fn rejects_malformed_callbacks() {
        assert!("reply".parse::<CallbackAction>().is_err());
        assert!("reply_x".parse::<CallbackAction>().is_err());
        assert!("archive_3".parse::<CallbackAction>().is_err());
    }

    #[test]
    fn application_buttons_round_trip_through_parser() {
        let Keyboard::Inline(rows) = get_application_keyboard(9) else {
            panic!("expected inline keyboard");
        };
        let actions: Vec<CallbackAction> = rows
            .iter()
            .flatten()
            .map(|b| b.callback_data.parse().unwrap())
            .collect();
        assert_eq!(
            actions,
            vec![
                CallbackAction::Reply(9),
                CallbackAction::Complete(9),
                CallbackAction::Delete(9)
            ]
        );
    }

    #[test]
    fn menu_labels_are_exact() {
        assert_eq!(MenuCommand::parse(APPLY), Some(MenuCommand::Apply));
        assert_eq!(MenuCommand::parse("оформить заявку"), None);
        assert!(MenuCommand::Statistics.admin_only());
        assert!(!MenuCommand::Contact.admin_only());
    }

    #[test]
    fn admin_sees_panel_button() {
        let Keyboard::Menu(rows) = get_main_keyboard(true) else {
            panic!("expected menu keyboard");
        };
        assert!(rows.iter().flatten().any(|label| label == ADMIN_PANEL));

        let Keyboard::Menu(rows) = get_main_keyboard(false) else {
            panic!("expected menu keyboard");
        };
        assert!(!rows.iter().flatten().any(|label| label == ADMIN_PANEL));
    }
}
