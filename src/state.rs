use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Available,
    Taken,
}

impl ItemStatus {
    /// The state a toggle asks the server for.
    pub fn toggled(self) -> Self {
        match self {
            ItemStatus::Available => ItemStatus::Taken,
            ItemStatus::Taken => ItemStatus::Available,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Available => "available",
            ItemStatus::Taken => "taken",
        }
    }

    /// Button label offering the opposite state.
    pub fn toggle_label(self) -> &'static str {
        match self {
            ItemStatus::Available => "Mark as Taken",
            ItemStatus::Taken => "Mark as Available",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Category {
    LabItems,
    Stationery,
    Clothing,
    #[default]
    Books,
    Electronics,
    SportsEquipment,
    Others,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::LabItems,
        Category::Stationery,
        Category::Clothing,
        Category::Books,
        Category::Electronics,
        Category::SportsEquipment,
        Category::Others,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::LabItems => "Lab Items",
            Category::Stationery => "Stationery",
            Category::Clothing => "Clothing",
            Category::Books => "Books",
            Category::Electronics => "Electronics",
            Category::SportsEquipment => "Sports Equipment",
            Category::Others => "Others",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("Unknown category {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Kept as sent by the server; [`Category`] only covers the known values.
    pub category: String,
    pub image_url: String,
    pub location: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub user_id: String,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
}

impl Item {
    pub fn excerpt(&self, max_chars: usize) -> String {
        let mut excerpt: String = self.description.chars().take(max_chars).collect();
        if self.description.chars().count() > max_chars {
            excerpt.push_str("...");
        }
        excerpt
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub item_id: Option<String>,
    pub sender_id: String,
    pub sender_name: String,
    #[serde(default)]
    pub receiver_id: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UserRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ItemRef {
    pub id: String,
    pub title: String,
    pub image_url: String,
}

/// Server-side rollup of one thread, only ever displayed.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConversationSummary {
    pub conversation_id: String,
    pub other_user: UserRef,
    pub item: ItemRef,
    pub last_message: String,
    pub last_message_at: DateTime<Utc>,
    pub unread_count: u32,
}

/// The two ids scoping a thread: the item discussed and the other participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThreadKey {
    pub item_id: String,
    pub counterpart_id: String,
}

impl ThreadKey {
    pub fn new(item_id: impl Into<String>, counterpart_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            counterpart_id: counterpart_id.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Signup {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

/// What login and signup hand back.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthGrant {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutgoingMessage {
    pub item_id: String,
    pub receiver_id: String,
    pub message: String,
}
