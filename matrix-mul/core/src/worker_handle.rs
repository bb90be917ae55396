use crate::WorkerId;

/// Binds a spawned worker to the row it owns and to the reading end of its channel
#[derive(Debug)]
pub struct WorkerHandle<R> {
    id: WorkerId,
    row: usize,
    reader: R,
}

impl<R> WorkerHandle<R> {
    pub fn new(id: WorkerId, row: usize, reader: R) -> Self {
        Self { id, row, reader }
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn reader_mut(&mut self) -> &mut R {
        &mut self.reader
    }
}
