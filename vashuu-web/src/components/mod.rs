pub mod catch_area;
pub mod modal;
pub mod particles;
pub mod question_card;
pub mod reveal_text;
pub mod screen;
pub mod vector_slot;

pub use catch_area::CatchArea;
pub use modal::Modal;
pub use particles::ParticleLayer;
pub use question_card::QuestionCard;
pub use reveal_text::RevealText;
pub use screen::Screen;
pub use vector_slot::VectorSlotView;
