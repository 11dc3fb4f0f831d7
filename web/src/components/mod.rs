pub mod address_search;
pub mod candidate_list;
pub mod notice;
pub mod pub_details_form;
pub mod pub_table;

pub use address_search::AddressSearch;
pub use candidate_list::CandidateList;
pub use notice::{Notice, NoticeView};
pub use pub_details_form::PubDetailsForm;
pub use pub_table::PubTable;
