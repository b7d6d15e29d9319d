use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{error, info};

use crate::relay_client::RelayClient;
use crate::wire::ChatRequest;

pub const GREETING: &str = "👋 Hi! I'm CartPilot. I can help you find products from our store, \
answer questions, or recommend items based on images. Try asking me something like \
'Recommend a sports t-shirt' or attach an image!";
pub const APOLOGY: &str = "❌ Sorry, something went wrong. Please try again.";
/// Text used for a user turn that carries only an image.
pub const IMAGE_ONLY_TEXT: &str = "What do you see in this image?";
pub const EXAMPLE_PROMPTS: [&str; 3] = [
    "What can you do?",
    "Recommend a sports t-shirt",
    "Best products for gym",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// Local preview of the attached image (data URI), user turns only.
    pub image: Option<String>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>, image: Option<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            image,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            image: None,
        }
    }
}

/// An image picked from disk, encoded once for both preview and upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub path: PathBuf,
    pub data_uri: String,
}

impl Attachment {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).context(format!("Failed to read image {}", path.display()))?;
        let data_uri = format!("data:{};base64,{}", mime_for(path), STANDARD.encode(bytes));
        Ok(Self {
            path: path.to_path_buf(),
            data_uri,
        })
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing to send, or a request was already pending.
    Ignored,
    Replied,
    /// Transport failed; the apology turn was appended instead.
    Failed,
}

/// One client session: the transcript, the pending flag and the current attachment.
#[derive(Debug)]
pub struct ChatSession {
    relay: RelayClient,
    messages: Vec<ChatMessage>,
    pending: bool,
    attachment: Option<Attachment>,
}

impl ChatSession {
    pub fn new(relay: RelayClient) -> Self {
        Self {
            relay,
            messages: vec![ChatMessage::assistant(GREETING)],
            pending: false,
            attachment: None,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    pub fn attach_image(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let attachment = Attachment::from_file(path)?;
        info!(path = %attachment.path.display(), bytes = attachment.data_uri.len(), "Image attached");
        self.attachment = Some(attachment);
        Ok(())
    }

    pub fn remove_image(&mut self) {
        self.attachment = None;
    }

    /// Sends one turn to the relay and appends the reply, or the apology on failure.
    pub async fn submit(&mut self, text: &str) -> SubmitOutcome {
        let text = text.trim();
        if (text.is_empty() && self.attachment.is_none()) || self.pending {
            return SubmitOutcome::Ignored;
        }

        let content = if text.is_empty() { IMAGE_ONLY_TEXT } else { text };
        let image = self.attachment.as_ref().map(|a| a.data_uri.clone());
        self.messages.push(ChatMessage::user(content, image.clone()));
        self.pending = true;

        let request = ChatRequest {
            message: Some(content.to_string()),
            image,
        };
        let outcome = match self.relay.chat(&request).await {
            Ok(response) => {
                self.messages.push(ChatMessage::assistant(response.reply));
                SubmitOutcome::Replied
            }
            Err(e) => {
                error!("Error: {:#}", e);
                self.messages.push(ChatMessage::assistant(APOLOGY));
                SubmitOutcome::Failed
            }
        };

        self.pending = false;
        self.remove_image();
        outcome
    }
}
