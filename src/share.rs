//! Share-intent URLs for the four supported platforms.
//!
//! Each platform has a fixed URL template; the payload and share text are
//! percent-encoded into it (every byte outside `A-Z a-z 0-9 - _ . ~`). The
//! resulting intents are handed to an [`Opener`] fire-and-forget: nothing is
//! awaited or reported back.
//!
//! | Platform | Template |
//! |---|---|
//! | Facebook | `https://www.facebook.com/sharer/sharer.php?u={url}` |
//! | Twitter | `https://twitter.com/intent/tweet?text={text}&url={url}` |
//! | LinkedIn | `https://www.linkedin.com/sharing/share-offsite/?url={url}` |
//! | WhatsApp | `https://wa.me/?text={text}` |

use crate::config::ShareSettings;
use urlencoding::encode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Facebook,
    Twitter,
    LinkedIn,
    WhatsApp,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Facebook,
        Platform::Twitter,
        Platform::LinkedIn,
        Platform::WhatsApp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Platform::Facebook => "Facebook",
            Platform::Twitter => "Twitter",
            Platform::LinkedIn => "LinkedIn",
            Platform::WhatsApp => "WhatsApp",
        }
    }

    pub fn share_url(self, content: &ShareContent) -> String {
        let url = encode(&content.url);
        let text = encode(&content.text);
        match self {
            Platform::Facebook => format!("https://www.facebook.com/sharer/sharer.php?u={url}"),
            Platform::Twitter => format!("https://twitter.com/intent/tweet?text={text}&url={url}"),
            Platform::LinkedIn => {
                format!("https://www.linkedin.com/sharing/share-offsite/?url={url}")
            }
            Platform::WhatsApp => format!("https://wa.me/?text={text}"),
        }
    }
}

/// What gets shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareContent {
    pub url: String,
    pub text: String,
}

impl ShareContent {
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
        }
    }

    /// Share a payload with the default message.
    pub fn for_payload(payload: &str) -> Self {
        Self::new(payload, format!("Check out this link: {payload}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupSize {
    pub width: u32,
    pub height: u32,
}

impl PopupSize {
    pub fn from_settings(settings: &ShareSettings) -> Self {
        Self {
            width: settings.popup_width,
            height: settings.popup_height,
        }
    }

    /// `window.open` feature string.
    pub fn features(self) -> String {
        format!("width={},height={}", self.width, self.height)
    }
}

impl Default for PopupSize {
    fn default() -> Self {
        Self::from_settings(&ShareSettings::default())
    }
}

/// A share URL ready to be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareIntent {
    pub platform: Platform,
    pub url: String,
    pub popup: PopupSize,
}

pub fn share_intent(platform: Platform, content: &ShareContent, popup: PopupSize) -> ShareIntent {
    ShareIntent {
        platform,
        url: platform.share_url(content),
        popup,
    }
}

/// One intent per platform, in [`Platform::ALL`] order.
pub fn share_intents(content: &ShareContent, popup: PopupSize) -> Vec<ShareIntent> {
    Platform::ALL
        .iter()
        .map(|&platform| share_intent(platform, content, popup))
        .collect()
}

/// Opens a share intent. Fire-and-forget: there is no result to report.
pub trait Opener {
    fn open(&self, intent: &ShareIntent);
}

/// Prints each intent to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrintOpener;

impl Opener for PrintOpener {
    fn open(&self, intent: &ShareIntent) {
        crate::output::print_share_intent(intent);
    }
}

/// Open the intent for every platform.
pub fn share_everywhere(content: &ShareContent, popup: PopupSize, opener: &dyn Opener) {
    for intent in share_intents(content, popup) {
        tracing::debug!(platform = intent.platform.name(), url = %intent.url, "opening share intent");
        opener.open(&intent);
    }
}
