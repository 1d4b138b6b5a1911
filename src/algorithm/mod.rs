//! Algorithm contracts and the generic algorithms built on them
//!
//! Every numerical primitive is defined as a trait first and implemented per
//! backend client. The algorithms in this module take the client as a
//! generic parameter bounded by the capabilities they use:
//!
//! ```text
//! lu_solve(client: &C, ...)  where C: TriangularSolve<R> + IndexingOps<R>
//!        │
//!        ├── CpuClient     (reference backend, `cpu` feature)
//!        └── any other client implementing the same traits
//! ```

pub mod linalg;
