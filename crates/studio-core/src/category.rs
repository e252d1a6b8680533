//! Content categories offered on the scenario screen.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Whose voice a category speaks in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryGroup {
    /// Brand perspective: product knowledge, proof, promotion
    Brand,
    /// Personal perspective: the founder's own life
    Personal,
}

/// The kind of post being written.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentCategory {
    Pro,
    Testimonial,
    Promo,
    LifeAesthetic,
    LifeThought,
    LifeDaily,
}

impl ContentCategory {
    pub fn group(self) -> CategoryGroup {
        match self {
            Self::Pro | Self::Testimonial | Self::Promo => CategoryGroup::Brand,
            Self::LifeAesthetic | Self::LifeThought | Self::LifeDaily => CategoryGroup::Personal,
        }
    }

    pub fn is_personal(self) -> bool {
        self.group() == CategoryGroup::Personal
    }

    /// Short label shown in the picker and stored on library items.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pro => "Expert value",
            Self::Testimonial => "Trust & proof",
            Self::Promo => "Promotion",
            Self::LifeAesthetic => "Aesthetic life",
            Self::LifeThought => "Founder notes",
            Self::LifeDaily => "Everyday life",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Pro => "Knowledge, insider tips",
            Self::Testimonial => "Customer reviews, partners",
            Self::Promo => "Offers, new releases",
            Self::LifeAesthetic => "Books, flowers, photography",
            Self::LifeThought => "Reflections, honesty, struggle",
            Self::LifeDaily => "Food, humour, family",
        }
    }

    /// Writing guideline handed to the text collaborator.
    pub fn guideline(self) -> &'static str {
        match self {
            Self::Pro => {
                "[Brand - expert value] Rice wine knowledge, tasting tips, industry insight. Lead with generosity, not lecturing."
            }
            Self::Testimonial => {
                "[Brand - trust] Customer orders, reviews and stories that vouch for the brand."
            }
            Self::Promo => "[Brand - promotion] New releases and offers. Aim for conversion.",
            Self::LifeAesthetic => {
                "[Personal - aesthetic life] Reading, flower arranging, art, photography. The wine need not appear; show the founder's taste."
            }
            Self::LifeThought => {
                "[Personal - founder notes] Reflections, doubts, hard days. A real founder with flesh and blood; sincerity first."
            }
            Self::LifeDaily => {
                "[Personal - everyday life] Food, family, a good joke. Pure life sharing to build closeness and replies."
            }
        }
    }
}
