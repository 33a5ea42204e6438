mod ws_event_dto;

pub use ws_event_dto::{ClientEvent, MessageFromServerDto, NewMessageDto, ServerEvent};
