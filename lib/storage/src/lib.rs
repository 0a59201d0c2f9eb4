pub mod records;
pub mod seed;
pub mod snapshot;
pub mod store;

pub use records::{CandidateRecord, OrganizationRecord, RoleRecord, SalaryRange, StoredRespondent};
pub use seed::{SeedCandidate, SeedData, SeedOrganization, SeedSummary};
pub use snapshot::{SnapshotFile, StoreState, SNAPSHOT_FILENAME};
pub use store::{DropView, Store};
