//! The probe library: C1's pure lexical/static-list probes (spec
//! §4.1-§4.3), plus the MX and blacklist probes the orchestrator launches
//! alongside them in step 5 of §4.13 — these do I/O over the DNS client
//! but have no home of their own in the module map, so they live here next
//! to the probe they settle (`domain_format`) and the data they share
//! (`static_data::dnsbl`, also used by `reputation::dnsbl`).

pub mod blacklist;
pub mod domain_format;
pub mod lists;
pub mod mx;
pub mod syntax;
