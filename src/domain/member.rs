use serde::Serialize;

use super::{Credits, MemberId, MemberName};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Member {
    pub id: MemberId,
    pub name: MemberName,
    pub credits: Credits,
}

impl Member {
    pub fn new(id: MemberId, name: MemberName, credits: Credits) -> Self {
        Self { id, name, credits }
    }
}
