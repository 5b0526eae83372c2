//! Fixed user-facing texts. Plain text unless the name says otherwise.

pub const WELCOME: &str = "Добро пожаловать! Выберите действие:";
pub const CHOOSE_ACTION: &str = "Выберите действие:";
pub const FALLBACK: &str = "❓ Не нашёл подходящий вариант. Открою стартовое меню 📋";
pub const CANCELLED: &str = "Действие отменено.";
pub const GENERIC_ERROR: &str = "❌ Произошла ошибка. Попробуйте еще раз.";
pub const RESTART_APPLICATION: &str = "❌ Произошла ошибка. Начните оформление заявки заново.";

pub const ASK_FIO: &str = "📝 Пожалуйста, введите ваше ФИО:";
pub const ASK_FIO_AGAIN: &str = "Пожалуйста, введите ваше ФИО:";
pub const ASK_PHONE: &str = "📞 Теперь введите ваш номер телефона:\nПример: +7 (000) 000 00 00";
pub const PHONE_HINT: &str =
    "Пожалуйста, введите корректный номер телефона (например: +7 (999) 123 45 67 или +7 999 123 45 67)";
pub const ASK_INFO: &str = "💬 Расскажите, чем мы можем вам помочь?\nКакую мебель подбираете?\nКухня, шкаф, гардеробная?\n\nЕсть ли у вас уже проект мебели, или нужно спроектировать?";
pub const ASK_INFO_AGAIN: &str = "Пожалуйста, опишите ваши потребности:";
pub const APPLICATION_SAVED: &str = "✅ Ваши данные сохранены! С вами свяжутся в ближайшее время.";
pub const APPLICATION_SAVE_FAILED: &str = "❌ Произошла ошибка при сохранении заявки. Попробуйте еще раз.";
pub const USER_NOT_FOUND: &str = "❌ Пользователь не найден. Начните оформление заявки заново.";
pub const REMINDER: &str = "Вы начали оформлять заявку, но не завершили. Хотите продолжить?";

pub const NO_ACCESS: &str = "У вас нет прав доступа к этой функции.";
pub const NO_PANEL_ACCESS: &str = "У вас нет прав доступа к админ-панели.";
/// MarkdownV2.
pub const ADMIN_PANEL: &str = "🔧 *Панель администратора*\n\nВыберите действие:";

pub const NO_APPLICATIONS: &str = "📋 Заявок пока нет.";
pub const LISTING_FAILED: &str = "❌ Произошла ошибка при загрузке заявок.";
pub const ALL_USERS_APPLIED: &str = "Все пользователи оформили заявки! 🎉";

pub const NOTHING_TO_DELETE: &str = "❌ Заявок для удаления нет.";
pub const DELETE_NOT_FOUND: &str = "❌ Заявка с таким номером не найдена.";
pub const DELETE_BAD_NUMBER: &str = "❌ Пожалуйста, введите корректный номер заявки (только цифры).";
pub const DELETE_FAILED: &str = "❌ Ошибка при удалении заявки.";

/// MarkdownV2.
pub const BROADCAST_PROMPT: &str = "📢 *Рассылка*\n\nВведите сообщение для рассылки:";
pub const BROADCAST_NO_USERS: &str = "Нет пользователей для рассылки.";
pub const BROADCAST_CANCELLED: &str = "❌ Рассылка отменена";

pub const APPLICATION_NOT_FOUND: &str = "❌ Заявка не найдена.";
pub const OWNER_NOT_FOUND: &str = "❌ Не удалось найти пользователя для отправки ответа.";
pub const STATUS_UPDATE_FAILED: &str = "❌ Ошибка при обновлении статуса заявки.";

pub fn contact_manager(contact: &str) -> String {
    format!("Для связи с менеджером/дизайнером напишите {}", contact)
}

/// The question of the step a form is currently waiting on.
pub fn form_prompt(state: &crate::types::BotDialogState) -> Option<&'static str> {
    use crate::types::BotDialogState;
    match state {
        BotDialogState::ApplicationFio => Some(ASK_FIO),
        BotDialogState::ApplicationPhone { .. } => Some(ASK_PHONE),
        BotDialogState::ApplicationInfo { .. } => Some(ASK_INFO),
        _ => None,
    }
}
