use std::collections::HashMap;

use tera::{Context, Tera, Value};

use crate::{
    entity::{applications, users},
    errors::Result,
    types::ApplicationStatus,
    validation::escape_markdown,
};

pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn markdown_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    Ok(Value::String(escape_markdown(&raw)))
}

/// Loads the bundled message templates. `.md` templates are MarkdownV2 and
/// must pipe every interpolated value through the `md` filter.
pub fn init() -> Result<Tera> {
    let mut tera = Tera::default();
    tera.register_filter("md", markdown_filter);
    tera.add_raw_templates(vec![
        ("application_card.md", include_str!("../templates/application_card.md")),
        ("admin_reply.md", include_str!("../templates/admin_reply.md")),
        ("statistics.md", include_str!("../templates/statistics.md")),
        ("inactive_users.md", include_str!("../templates/inactive_users.md")),
        ("activity_summary.md", include_str!("../templates/activity_summary.md")),
        ("broadcast_report.md", include_str!("../templates/broadcast_report.md")),
        ("delete_candidates.txt", include_str!("../templates/delete_candidates.txt")),
    ])?;
    Ok(tera)
}

pub fn render(tera: &Tera, name: &str, context: &Context) -> Result<String> {
    Ok(tera.render(name, context)?.trim_end().to_string())
}

fn card_context(
    application: &applications::Model,
    owner: Option<&users::Model>,
    fresh: bool,
) -> Context {
    let mut context = Context::new();
    context.insert("fresh", &fresh);
    context.insert("id", &application.id);
    context.insert(
        "first_name",
        owner
            .and_then(|u| u.first_name.as_deref())
            .unwrap_or("Не указан"),
    );
    context.insert(
        "username",
        owner.and_then(|u| u.username.as_deref()).unwrap_or(""),
    );
    context.insert("name", &application.name);
    context.insert("phone", &application.phone);
    context.insert("info", &application.additional_info);
    context.insert(
        "created_at",
        &application.created_at.format(DATE_FORMAT).to_string(),
    );
    context.insert(
        "status",
        &ApplicationStatus::from(application.status.as_str()).label(),
    );
    context
}

/// MarkdownV2 card describing one application.
pub fn application_card(
    tera: &Tera,
    application: &applications::Model,
    owner: Option<&users::Model>,
    fresh: bool,
) -> Result<String> {
    render(tera, "application_card.md", &card_context(application, owner, fresh))
}

/// Unformatted variant used when the rich card is rejected by the transport.
pub fn plain_application_card(application: &applications::Model, owner: Option<&users::Model>) -> String {
    let first_name = owner
        .and_then(|u| u.first_name.as_deref())
        .unwrap_or("Не указан");
    format!(
        "📧 Заявка #{}\n👤 Пользователь: {}\n🔥 ФИО: {}\n📞 Телефон: {}\n💬 Запрос: {}\n🕐 Дата: {}\n📊 Статус: {}",
        application.id,
        first_name,
        application.name,
        application.phone,
        application.additional_info,
        application.created_at.format(DATE_FORMAT),
        ApplicationStatus::from(application.status.as_str()).label(),
    )
}
