use async_trait::async_trait;

use crate::error::AdminEnumerationError;

/// Reply used when administrators cannot be listed.
pub const ADMIN_LOOKUP_FAILED: &str = "Ошибка при получении информации о пользователях.";

/// Administrator of the current chat, as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatAdmin {
    pub id: u64,
    pub username: Option<String>,
    pub first_name: String,
}

impl ChatAdmin {
    /// `@username`, or an HTML link to the user's id when no username is set.
    pub fn mention(&self) -> String {
        match self.username.as_deref().filter(|u| !u.is_empty()) {
            Some(username) => format!("@{username}"),
            None => format!(
                r#"<a href="tg://user?id={}">{}</a>"#,
                self.id,
                html_escape::encode_text(&self.first_name)
            ),
        }
    }
}

#[async_trait]
pub trait AdminDirectory: Send + Sync {
    /// Administrators of the chat in platform order.
    async fn administrators(&self) -> Result<Vec<ChatAdmin>, AdminEnumerationError>;
}

/// Mention every admin except the bot itself, space separated, order preserved.
pub fn compose_mentions(admins: &[ChatAdmin], bot_id: u64) -> String {
    admins
        .iter()
        .filter(|admin| admin.id != bot_id)
        .map(ChatAdmin::mention)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the `/all` reply. Enumeration failures are logged and turned into
/// [`ADMIN_LOOKUP_FAILED`].
pub async fn mention_admins<D: AdminDirectory + ?Sized>(directory: &D, bot_id: u64) -> String {
    match directory.administrators().await {
        Ok(admins) => compose_mentions(&admins, bot_id),
        Err(err) => {
            tracing::error!(error = %err, "Failed to get chat administrators");
            ADMIN_LOOKUP_FAILED.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT_ID: u64 = 1000;

    fn admin(id: u64, username: Option<&str>, first_name: &str) -> ChatAdmin {
        ChatAdmin {
            id,
            username: username.map(str::to_string),
            first_name: first_name.to_string(),
        }
    }

    struct StaticDirectory(Vec<ChatAdmin>);

    #[async_trait]
    impl AdminDirectory for StaticDirectory {
        async fn administrators(&self) -> Result<Vec<ChatAdmin>, AdminEnumerationError> {
            Ok(self.0.clone())
        }
    }

    struct FailingDirectory;

    #[async_trait]
    impl AdminDirectory for FailingDirectory {
        async fn administrators(&self) -> Result<Vec<ChatAdmin>, AdminEnumerationError> {
            Err(anyhow::anyhow!("Bad Request: chat not found").into())
        }
    }

    #[tokio::test]
    async fn bot_is_excluded_and_order_kept() {
        let directory = StaticDirectory(vec![
            admin(1, Some("alice"), "Alice"),
            admin(BOT_ID, Some("weather_bot"), "Погодный бот"),
            admin(2, None, "Борис"),
        ]);

        let text = mention_admins(&directory, BOT_ID).await;

        assert_eq!(text, r#"@alice <a href="tg://user?id=2">Борис</a>"#);
    }

    #[tokio::test]
    async fn enumeration_failure_gives_fixed_reply() {
        let text = mention_admins(&FailingDirectory, BOT_ID).await;

        assert_eq!(text, ADMIN_LOOKUP_FAILED);
    }

    #[test]
    fn names_are_html_escaped() {
        let mention = admin(5, None, "<b>Tom & Jerry</b>").mention();

        assert_eq!(
            mention,
            r#"<a href="tg://user?id=5">&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;</a>"#
        );
    }

    #[test]
    fn empty_username_falls_back_to_link() {
        let mention = admin(9, Some(""), "Ира").mention();

        assert_eq!(mention, r#"<a href="tg://user?id=9">Ира</a>"#);
    }

    #[test]
    fn only_the_bot_yields_empty_text() {
        let text = compose_mentions(&[admin(BOT_ID, Some("weather_bot"), "bot")], BOT_ID);

        assert!(text.is_empty());
    }
}
