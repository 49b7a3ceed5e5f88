#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FaceIndex(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct MaterialId(pub u64);

impl From<u32> for FaceIndex {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

impl From<FaceIndex> for u32 {
    fn from(v: FaceIndex) -> Self {
        v.0
    }
}

impl From<usize> for FaceIndex {
    fn from(v: usize) -> Self {
        Self(v as u32)
    }
}

impl From<FaceIndex> for usize {
    fn from(v: FaceIndex) -> Self {
        v.0 as usize
    }
}

impl From<u64> for MaterialId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
