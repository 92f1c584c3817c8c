pub(crate) mod completion;
mod diagnostics;
pub(crate) mod hover;

use camino::Utf8PathBuf;
use classy_db::{File, RootDatabase};

use crate::Vocabulary;

pub struct Analysis {
    db: RootDatabase,
    vocabulary: Vocabulary,
}

impl Default for Analysis {
    fn default() -> Self {
        Self::new(Vocabulary::builtin())
    }
}

impl Analysis {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { db: RootDatabase::default(), vocabulary }
    }

    pub fn db(&self) -> &RootDatabase {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut RootDatabase {
        &mut self.db
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn add_file(&self, path: impl Into<Utf8PathBuf>, text: impl Into<String>) -> File {
        File::new(&self.db, path.into(), text.into())
    }
}
