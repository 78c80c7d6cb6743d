// Adapters layer: concrete HTTP implementations of the domain ports.

pub mod openai;
pub mod scryfall;

pub use openai::ChatGenerator;
pub use scryfall::ScryfallClient;
