/// One directed edge of the social graph: `follower_id` follows `followed_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Follow {
    pub follower_id: i64,
    pub followed_id: i64,
}
