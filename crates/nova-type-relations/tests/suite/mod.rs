
mod capture;
mod closure;
mod logging;
mod subtyping;
mod supertypes;
