mod convert;
mod encode;
mod upload;

use hlshash_engine::{OnEvent, PlaylistConverter};

pub use self::convert::run_convert;
pub use self::encode::encode_hls;
pub use self::upload::run_upload;

fn attach_events(converter: PlaylistConverter, on_event: Option<OnEvent>) -> PlaylistConverter {
    match on_event {
        Some(on_event) => converter.with_event_handler(on_event),
        None => converter,
    }
}
