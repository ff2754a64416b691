#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub user_id: i64,
    pub chat_id: i64,
    pub payload: Payload,
}

#[derive(Debug, Clone)]
pub enum Payload {
    Command(String),
    Voice { file_id: String },
}
