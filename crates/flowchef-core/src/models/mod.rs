pub mod message;
pub mod output;
pub mod recipe;

pub use message::{ContentKind, Message, MessageBody, MessageContent, Role};
pub use output::{RecipeOutput, RecipePatch};
pub use recipe::{FlowGroup, MiseEnPlace, Recipe, Step, StepType};
