use bytes::BytesMut;
use bytemuck::Pod;
use log::{debug, warn};
use super::query::ReflectionIndex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformMember {
    /// Member name without the block prefix.
    pub name: String,
    pub offset: usize,
    pub nbyte: usize,
}

/// Host-side mirror of a uniform block, written member by member.
#[derive(Debug, Clone)]
pub struct UniformBlockView {
    name: String,
    data: BytesMut,
    members: Vec<UniformMember>,
}
impl UniformBlockView {
    /// Allocate a zeroed buffer for `block_name`. If the block is unknown the
    /// buffer stays empty; member discovery is done regardless.
    pub fn new(index: &ReflectionIndex, block_name: &str) -> UniformBlockView {
        let data = match index.gather_buf_info(block_name) {
            Some(info) => BytesMut::from(vec![0u8; info.size]),
            None => {
                warn!("uniform block '{}' is not declared by any stage", block_name);
                BytesMut::new()
            },
        };
        let prefix = format!("{}.", block_name);
        let members = index.gather_block_member_names()
            .into_iter()
            .filter(|x| x.starts_with(&prefix))
            .filter_map(|full_name| {
                let info = index.gather_buf_info(&full_name)?;
                let member = UniformMember {
                    name: full_name[prefix.len()..].to_owned(),
                    offset: info.offset,
                    nbyte: info.size,
                };
                Some(member)
            })
            .collect::<Vec<_>>();
        debug!("uniform block '{}' has {} bytes in {} members", block_name,
            data.len(), members.len());
        UniformBlockView {
            name: block_name.to_owned(),
            data: data,
            members: members,
        }
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn size(&self) -> usize { self.data.len() }
    pub fn data(&self) -> &[u8] { &self.data }
    pub fn members(&self) -> &[UniformMember] { &self.members }
    pub fn member_names(&self) -> impl Iterator<Item=&str> {
        self.members.iter().map(|x| x.name.as_str())
    }
    pub fn member(&self, name: &str) -> Option<&UniformMember> {
        self.members.iter().find(|x| x.name == name)
    }

    /// Copy `bytes` to the start of member `name`. Nothing is written if the
    /// member is unknown or `bytes` doesn't fit in it.
    pub fn set_member_bytes(&mut self, name: &str, bytes: &[u8]) -> bool {
        let (offset, nbyte) = match self.member(name) {
            Some(member) => (member.offset, member.nbyte),
            None => {
                warn!("uniform block '{}' has no member '{}'", self.name, name);
                return false;
            },
        };
        if bytes.len() > nbyte || offset + bytes.len() > self.data.len() {
            warn!("{} bytes don't fit in '{}.{}'", bytes.len(), self.name, name);
            return false;
        }
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        true
    }
    pub fn set_member<T: Pod>(&mut self, name: &str, value: &T) -> bool {
        self.set_member_bytes(name, bytemuck::bytes_of(value))
    }
}
