use crate::infrastructure::storage::StorageFacade;

#[derive(Clone)]
pub struct KvUserRepo {
    pub storage: StorageFacade,
}

#[derive(Clone)]
pub struct KvMediaRepo {
    pub storage: StorageFacade,
}

#[derive(Clone)]
pub struct KvCommentRepo {
    pub storage: StorageFacade,
}

impl KvUserRepo {
    pub fn new(storage: StorageFacade) -> Self {
        KvUserRepo { storage }
    }
}

impl KvMediaRepo {
    pub fn new(storage: StorageFacade) -> Self {
        KvMediaRepo { storage }
    }
}

impl KvCommentRepo {
    pub fn new(storage: StorageFacade) -> Self {
        KvCommentRepo { storage }
    }
}
