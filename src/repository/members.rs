//! Member registry keyed by member ID

use indexmap::IndexMap;

use crate::models::member::Member;

#[derive(Debug, Default, Clone)]
pub struct MembersRepository {
    members: IndexMap<String, Member>,
}

impl MembersRepository {
    pub fn contains(&self, id: &str) -> bool {
        self.members.contains_key(id)
    }

    pub fn insert(&mut self, member: Member) {
        self.members.insert(member.id().to_string(), member);
    }

    pub fn get(&self, id: &str) -> Option<&Member> {
        self.members.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Member> {
        self.members.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
