use arbitrary::{Arbitrary, Result, Unstructured};

/// One operation against a store under test.
#[derive(Arbitrary, Clone, Copy, Debug)]
pub enum StoreOp {
    /// `set` with ids narrowed to keep capacities manageable. A value
    /// of `u32::MAX` exercises the empty-sentinel path.
    Set { id: u16, value: u32 },
    Get { id: u16 },
    Clear,
}

/// Common fuzz input for store targets: a grow increment plus an
/// operation tape to replay against the store and a model.
#[derive(Debug)]
pub struct StorePlan {
    pub grow_increment: usize,
    pub ops: Vec<StoreOp>,
}

impl Arbitrary<'_> for StorePlan {
    fn arbitrary(u: &mut Unstructured<'_>) -> Result<Self> {
        // Ensure the logger is initialized.
        let _ = pretty_env_logger::try_init();

        let grow_increment = u.int_in_range(1..=4096)?;
        log::trace!("Using grow increment: {grow_increment}");
        Ok(StorePlan {
            grow_increment,
            ops: u.arbitrary()?,
        })
    }
}

/// One operation against a storage engine under test.
#[derive(Arbitrary, Clone, Copy, Debug)]
pub enum TableOp {
    Set { index: u16, value: u32 },
    Remove { index: u16 },
    Resize { len: u16 },
    Clear,
}

/// Fuzz input for engine targets.
#[derive(Debug)]
pub struct TablePlan {
    pub ops: Vec<TableOp>,
}

impl Arbitrary<'_> for TablePlan {
    fn arbitrary(u: &mut Unstructured<'_>) -> Result<Self> {
        // Ensure the logger is initialized.
        let _ = pretty_env_logger::try_init();

        Ok(TablePlan { ops: u.arbitrary()? })
    }
}
