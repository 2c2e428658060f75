use crate::config::ApiConfig;
use crate::error::{ApiError, ErrorBody};
use crate::items::NewItem;
use crate::state::{
    AuthGrant, ConversationSummary, Credentials, Item, ItemStatus, Message, OutgoingMessage,
    Signup, ThreadKey, User,
};
use reqwest::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Everything the client asks of the marketplace backend.
///
/// Futures are not `Send`: the browser runs all of them on one thread.
#[allow(async_fn_in_trait)]
pub trait Backend: Clone + 'static {
    async fn me(&self, token: &str) -> Result<User, ApiError>;
    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant, ApiError>;
    async fn signup(&self, signup: &Signup) -> Result<AuthGrant, ApiError>;

    async fn items(&self) -> Result<Vec<Item>, ApiError>;
    async fn item(&self, item_id: &str) -> Result<Item, ApiError>;
    async fn user_items(&self, user_id: &str) -> Result<Vec<Item>, ApiError>;
    async fn create_item(&self, token: &str, item: NewItem) -> Result<Item, ApiError>;
    async fn update_status(
        &self,
        token: &str,
        item_id: &str,
        status: ItemStatus,
    ) -> Result<(), ApiError>;

    async fn conversations(&self, token: &str) -> Result<Vec<ConversationSummary>, ApiError>;
    async fn thread(&self, token: &str, key: &ThreadKey) -> Result<Vec<Message>, ApiError>;
    async fn send_message(
        &self,
        token: &str,
        message: &OutgoingMessage,
    ) -> Result<Message, ApiError>;
}

/// `{"success": bool, ...payload}` as wrapped by most single-object endpoints.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(flatten)]
    payload: T,
}

impl<T> Envelope<T> {
    fn into_result(self) -> Result<T, ApiError> {
        if self.success {
            Ok(self.payload)
        } else {
            Err(ApiError::Rejected)
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    user: User,
}

#[derive(Debug, Deserialize)]
struct ItemPayload {
    item: Item,
}

#[derive(Debug, Deserialize)]
struct MessagePayload {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Ack {}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, ApiError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res.json().await?);
    }
    let detail = match res.json::<ErrorBody>().await {
        Ok(body) => body.into_detail(),
        Err(_) => status.canonical_reason().unwrap_or_default().to_string(),
    };
    Err(ApiError::Server {
        status: status.as_u16(),
        detail,
    })
}

/// [`Backend`] over HTTP.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    config: ApiConfig,
}

impl HttpBackend {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

impl Backend for HttpBackend {
    async fn me(&self, token: &str) -> Result<User, ApiError> {
        let url = self
            .config
            .endpoint_with_query(&["auth", "me"], &[("token", token)]);
        let res = self.client.get(url).send().await?;
        let envelope: Envelope<UserPayload> = decode(res).await?;
        Ok(envelope.into_result()?.user)
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant, ApiError> {
        let url = self.config.endpoint(&["auth", "login"]);
        let res = self.client.post(url).json(credentials).send().await?;
        let envelope: Envelope<AuthGrant> = decode(res).await?;
        envelope.into_result()
    }

    async fn signup(&self, signup: &Signup) -> Result<AuthGrant, ApiError> {
        let url = self.config.endpoint(&["auth", "signup"]);
        let res = self.client.post(url).json(signup).send().await?;
        let envelope: Envelope<AuthGrant> = decode(res).await?;
        envelope.into_result()
    }

    async fn items(&self) -> Result<Vec<Item>, ApiError> {
        let url = self.config.endpoint(&["items"]);
        decode(self.client.get(url).send().await?).await
    }

    async fn item(&self, item_id: &str) -> Result<Item, ApiError> {
        let url = self.config.endpoint(&["items", item_id]);
        let envelope: Envelope<ItemPayload> = decode(self.client.get(url).send().await?).await?;
        Ok(envelope.into_result()?.item)
    }

    async fn user_items(&self, user_id: &str) -> Result<Vec<Item>, ApiError> {
        let url = self.config.endpoint(&["items", "user", user_id]);
        decode(self.client.get(url).send().await?).await
    }

    async fn create_item(&self, token: &str, item: NewItem) -> Result<Item, ApiError> {
        let url = self.config.endpoint(&["items"]);
        let image = item.image;
        let file = multipart::Part::bytes(image.bytes)
            .file_name(image.name)
            .mime_str(&image.mime)?;
        let form = multipart::Form::new()
            .part("file", file)
            .text("token", token.to_string())
            .text("title", item.title)
            .text("description", item.description)
            .text("category", item.category.as_str())
            .text("location", item.location)
            .text("contact_phone", item.contact_phone);
        let res = self.client.post(url).multipart(form).send().await?;
        let envelope: Envelope<ItemPayload> = decode(res).await?;
        Ok(envelope.into_result()?.item)
    }

    async fn update_status(
        &self,
        token: &str,
        item_id: &str,
        status: ItemStatus,
    ) -> Result<(), ApiError> {
        let url = self.config.endpoint_with_query(
            &["items", item_id, "status"],
            &[("status", status.as_str()), ("token", token)],
        );
        let envelope: Envelope<Ack> = decode(self.client.patch(url).send().await?).await?;
        envelope.into_result()?;
        Ok(())
    }

    async fn conversations(&self, token: &str) -> Result<Vec<ConversationSummary>, ApiError> {
        let url = self
            .config
            .endpoint_with_query(&["conversations"], &[("token", token)]);
        decode(self.client.get(url).send().await?).await
    }

    async fn thread(&self, token: &str, key: &ThreadKey) -> Result<Vec<Message>, ApiError> {
        let url = self.config.endpoint_with_query(
            &["messages", key.item_id.as_str(), key.counterpart_id.as_str()],
            &[("token", token)],
        );
        decode(self.client.get(url).send().await?).await
    }

    async fn send_message(
        &self,
        token: &str,
        message: &OutgoingMessage,
    ) -> Result<Message, ApiError> {
        let url = self
            .config
            .endpoint_with_query(&["messages"], &[("token", token)]);
        let res = self.client.post(url).json(message).send().await?;
        let envelope: Envelope<MessagePayload> = decode(res).await?;
        Ok(envelope.into_result()?.message)
    }
}
