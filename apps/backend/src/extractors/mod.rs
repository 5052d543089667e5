pub mod acting_player;
pub mod connection;
pub mod validated_json;

pub use acting_player::ActingPlayer;
pub use connection::Connection;
pub use validated_json::ValidatedJson;
