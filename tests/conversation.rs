mod common;

use common::{setup, submit_application, user, ADMIN, SECOND_ADMIN};
use intake_bot::{
    keyboards::{self, CallbackAction},
    messaging::{Keyboard, TextFormat},
    router,
    texts,
    types::{ApplicationStatus, BotDialogState, Command},
};

#[tokio::test]
async fn start_greets_and_registers_user() {
    let (app, messenger) = setup().await;
    let sender = user(1);

    router::on_command(&app, &sender, Command::Start).await;

    let stored = app.storage.get_user(1).await.unwrap().unwrap();
    assert_eq!(stored.username.as_deref(), Some("user1"));
    let messages = messenger.messages_to(1);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text, texts::WELCOME);
    let Some(Keyboard::Menu(rows)) = &messages[0].keyboard else {
        panic!("expected main menu");
    };
    assert!(!rows.iter().flatten().any(|label| label == keyboards::ADMIN_PANEL));
}

#[tokio::test]
async fn full_form_creates_application_and_notifies_each_admin() {
    let (app, messenger) = setup().await;
    let sender = user(1);

    router::on_text(&app, &sender, keyboards::APPLY).await;
    assert_eq!(
        app.storage.get_state(1).await.unwrap(),
        Some(BotDialogState::ApplicationFio)
    );

    router::on_text(&app, &sender, "  Иванов Иван  ").await;
    assert_eq!(
        app.storage.get_state(1).await.unwrap(),
        Some(BotDialogState::ApplicationPhone {
            fio: "Иванов Иван".to_string()
        })
    );

    router::on_text(&app, &sender, " +7 (999) 123 45 67 ").await;
    router::on_text(&app, &sender, "Кухня, проекта нет").await;

    assert_eq!(app.storage.get_state(1).await.unwrap(), None);
    let applications = app.storage.list_applications(10).await.unwrap();
    assert_eq!(applications.len(), 1);
    let application = &applications[0];
    assert_eq!(application.name, "Иванов Иван");
    assert_eq!(application.phone, "+7 (999) 123 45 67");
    assert_eq!(application.additional_info, "Кухня, проекта нет");
    assert_eq!(ApplicationStatus::from(application.status.as_str()), ApplicationStatus::New);

    let texts = messenger.texts_to(1);
    assert_eq!(
        texts,
        vec![
            texts::ASK_FIO.to_string(),
            texts::ASK_PHONE.to_string(),
            texts::ASK_INFO.to_string(),
            texts::APPLICATION_SAVED.to_string(),
            texts::CHOOSE_ACTION.to_string(),
        ]
    );

    for admin in [ADMIN, SECOND_ADMIN] {
        let cards = messenger.messages_to(admin);
        assert_eq!(cards.len(), 1, "admin {} gets exactly one card", admin);
        assert_eq!(cards[0].format, TextFormat::MarkdownV2);
        assert!(cards[0].text.contains("Новая заявка"));
        assert!(cards[0].text.contains(r"Иванов Иван"));
        let Some(Keyboard::Inline(rows)) = &cards[0].keyboard else {
            panic!("expected inline controls");
        };
        let first = rows[0][0].callback_data.parse::<CallbackAction>().unwrap();
        assert_eq!(first, CallbackAction::Reply(application.id));
    }
}

#[tokio::test]
async fn interleaved_forms_keep_their_own_answers() {
    let (app, _) = setup().await;
    let (first, second) = (user(1), user(2));

    for sender in [&first, &second] {
        router::on_text(&app, sender, keyboards::APPLY).await;
    }
    router::on_text(&app, &first, "Иванов Иван").await;
    router::on_text(&app, &second, "Петров Пётр").await;
    router::on_text(&app, &first, "+79991112233").await;
    router::on_text(&app, &second, "+79994445566").await;
    router::on_text(&app, &first, "Кухня").await;
    router::on_text(&app, &second, "Шкаф-купе").await;

    let applications = app.storage.list_applications(10).await.unwrap();
    assert_eq!(applications.len(), 2);
    for (telegram_id, name, phone, info) in [
        (1, "Иванов Иван", "+79991112233", "Кухня"),
        (2, "Петров Пётр", "+79994445566", "Шкаф-купе"),
    ] {
        let owner = app.storage.get_user(telegram_id).await.unwrap().unwrap();
        let application = applications
            .iter()
            .find(|application| application.user_id == owner.id)
            .unwrap();
        assert_eq!(application.name, name);
        assert_eq!(application.phone, phone);
        assert_eq!(application.additional_info, info);
        assert_eq!(app.storage.get_state(telegram_id).await.unwrap(), None);
    }
}

#[tokio::test]
async fn unreachable_admin_does_not_block_the_others() {
    let (app, messenger) = setup().await;
    messenger.fail_chat(ADMIN);

    submit_application(&app, &user(1), "Петров Пётр").await;

    assert!(messenger.messages_to(ADMIN).is_empty());
    assert_eq!(messenger.messages_to(SECOND_ADMIN).len(), 1);
    assert_eq!(messenger.last_text_to(1).as_deref(), Some(texts::CHOOSE_ACTION));
}

#[tokio::test]
async fn invalid_phone_keeps_the_step() {
    let (app, messenger) = setup().await;
    let sender = user(1);

    router::on_text(&app, &sender, keyboards::APPLY).await;
    router::on_text(&app, &sender, "Иванов Иван").await;
    router::on_text(&app, &sender, "12345").await;

    assert_eq!(messenger.last_text_to(1).as_deref(), Some(texts::PHONE_HINT));
    assert_eq!(
        app.storage.get_state(1).await.unwrap(),
        Some(BotDialogState::ApplicationPhone {
            fio: "Иванов Иван".to_string()
        })
    );
    assert_eq!(app.storage.count_applications().await.unwrap(), 0);
}

#[tokio::test]
async fn blank_fio_is_asked_again() {
    let (app, messenger) = setup().await;
    let sender = user(1);

    router::on_text(&app, &sender, keyboards::APPLY).await;
    router::on_text(&app, &sender, "   ").await;

    assert_eq!(messenger.last_text_to(1).as_deref(), Some(texts::ASK_FIO_AGAIN));
    assert_eq!(
        app.storage.get_state(1).await.unwrap(),
        Some(BotDialogState::ApplicationFio)
    );
}

#[tokio::test]
async fn idle_text_gets_fallback_menu() {
    let (app, messenger) = setup().await;

    router::on_text(&app, &user(1), "привет").await;

    let messages = messenger.messages_to(1);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text, texts::FALLBACK);
    assert!(matches!(messages[0].keyboard, Some(Keyboard::Menu(_))));
}

#[tokio::test]
async fn menu_button_escapes_an_unfinished_form() {
    let (app, messenger) = setup().await;
    let sender = user(1);

    router::on_text(&app, &sender, keyboards::APPLY).await;
    router::on_text(&app, &sender, "Иванов Иван").await;
    router::on_text(&app, &sender, keyboards::BACK).await;

    assert_eq!(app.storage.get_state(1).await.unwrap(), None);
    assert_eq!(messenger.last_text_to(1).as_deref(), Some(texts::CHOOSE_ACTION));
}

#[tokio::test]
async fn contact_button_shows_manager() {
    let (app, messenger) = setup().await;

    router::on_text(&app, &user(1), keyboards::CONTACT).await;

    assert_eq!(
        messenger.last_text_to(1).unwrap(),
        "Для связи с менеджером/дизайнером напишите @username_manager"
    );
}

#[tokio::test]
async fn cancel_drops_the_form() {
    let (app, messenger) = setup().await;
    let sender = user(1);

    router::on_text(&app, &sender, keyboards::APPLY).await;
    router::on_command(&app, &sender, Command::Cancel).await;

    assert_eq!(app.storage.get_state(1).await.unwrap(), None);
    assert_eq!(messenger.last_text_to(1).as_deref(), Some(texts::CANCELLED));
}

#[tokio::test]
async fn admin_only_label_is_denied_to_idle_user() {
    let (app, messenger) = setup().await;

    router::on_text(&app, &user(1), keyboards::STATISTICS).await;

    assert_eq!(messenger.last_text_to(1).as_deref(), Some(texts::NO_ACCESS));
}

#[tokio::test]
async fn admin_only_label_from_user_mid_form_is_form_input() {
    let (app, messenger) = setup().await;
    let sender = user(1);

    router::on_text(&app, &sender, keyboards::APPLY).await;
    router::on_text(&app, &sender, keyboards::STATISTICS).await;

    assert_eq!(messenger.last_text_to(1).as_deref(), Some(texts::ASK_PHONE));
    assert_eq!(
        app.storage.get_state(1).await.unwrap(),
        Some(BotDialogState::ApplicationPhone {
            fio: keyboards::STATISTICS.to_string()
        })
    );
}

#[tokio::test]
async fn unreadable_state_is_cleared() {
    use intake_bot::entity::user_states;
    use sea_orm::{ActiveModelTrait, ActiveValue};

    let (app, messenger) = setup().await;
    user_states::ActiveModel {
        chat_id: ActiveValue::Set(1),
        state: ActiveValue::Set("application_info".to_string()),
        payload: ActiveValue::Set(Some("not json".to_string())),
        updated_at: ActiveValue::Set(chrono::Utc::now().naive_utc()),
        reminded_at: ActiveValue::Set(None),
    }
    .insert(app.storage.connection())
    .await
    .unwrap();

    router::on_text(&app, &user(1), "Кухня").await;

    assert_eq!(app.storage.get_state(1).await.unwrap(), None);
    assert_eq!(
        messenger.last_text_to(1).as_deref(),
        Some(texts::RESTART_APPLICATION)
    );
    assert_eq!(app.storage.count_applications().await.unwrap(), 0);
}

#[tokio::test]
async fn help_lists_commands() {
    let (app, messenger) = setup().await;

    router::on_command(&app, &user(1), Command::Help).await;

    let help = messenger.last_text_to(1).unwrap();
    assert!(help.contains("/start"));
    assert!(help.contains("/cancel"));
}
