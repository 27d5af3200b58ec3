//! `look_up_class_member`: walks a class's linearized MRO looking for a
//! named member, the way attribute access, `super()` calls, and protocol
//! structural checks all need to.

use crate::ids::{ClassId, TypeId};
use crate::types::{ClassMember, MemberKind, TypeArena};
use pyanalyze_common::Atom;

/// Bit flags narrowing a member-lookup query, mirroring the small manual
/// flag wrappers used elsewhere in the codebase rather than pulling in a
/// macro for a handful of independent bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LookupFlags(u8);

impl LookupFlags {
    pub const SKIP_INSTANCE_VARIABLES: LookupFlags = LookupFlags(1 << 0);
    pub const SKIP_CLASS_VARIABLES: LookupFlags = LookupFlags(1 << 1);
    /// Only look at `self`, skip walking further up the MRO — used for
    /// `super().method()` which starts the walk one class higher instead.
    pub const THIS_CLASS_ONLY: LookupFlags = LookupFlags(1 << 2);

    #[must_use]
    pub const fn contains(self, other: LookupFlags) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn union(self, other: LookupFlags) -> LookupFlags {
        LookupFlags(self.0 | other.0)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct MemberLookupResult {
    pub type_id: TypeId,
    pub kind: MemberKind,
    pub owner: ClassId,
    pub is_private: bool,
}

#[must_use]
pub fn look_up_class_member(
    arena: &TypeArena,
    class: ClassId,
    name: Atom,
    flags: LookupFlags,
) -> Option<MemberLookupResult> {
    let mro = mro_for_lookup(arena, class, flags);
    for owner in mro {
        let data = arena.class(owner);
        if let Some(member) = data.members.get(&name) {
            if flags.contains(LookupFlags::SKIP_INSTANCE_VARIABLES) && member.kind == MemberKind::InstanceVar {
                continue;
            }
            if flags.contains(LookupFlags::SKIP_CLASS_VARIABLES) && member.kind == MemberKind::ClassVar {
                continue;
            }
            return Some(to_result(member, owner));
        }
    }
    None
}

/// Looks up starting one step above `class` in its own MRO — the
/// `super().attr` case, where `class` is the class the `super()` call sits
/// in and the search should skip its own overriding member.
#[must_use]
pub fn look_up_member_via_super(
    arena: &TypeArena,
    class: ClassId,
    name: Atom,
    flags: LookupFlags,
) -> Option<MemberLookupResult> {
    let full_mro = &arena.class(class).mro;
    for &owner in full_mro.iter().skip(1) {
        let data = arena.class(owner);
        if let Some(member) = data.members.get(&name) {
            return Some(to_result(member, owner));
        }
    }
    let _ = flags;
    None
}

fn to_result(member: &ClassMember, owner: ClassId) -> MemberLookupResult {
    MemberLookupResult { type_id: member.type_id, kind: member.kind, owner, is_private: member.is_private }
}

fn mro_for_lookup(arena: &TypeArena, class: ClassId, flags: LookupFlags) -> Vec<ClassId> {
    if flags.contains(LookupFlags::THIS_CLASS_ONLY) {
        vec![class]
    } else if arena.class(class).mro.is_empty() {
        vec![class]
    } else {
        arena.class(class).mro.clone()
    }
}

#[cfg(test)]
#[path = "tests/member_lookup.rs"]
mod tests;
