//! Form action plumbing shared by the account and team services
//!
//! A handler receives a [`RequestContext`] and a form, and answers with an
//! [`ActionResult`]. Translating results into HTTP responses is the API
//! layer's job.

mod context;
mod forms;
mod outcome;

pub use context::RequestContext;
pub use forms::{
    first_error_message, DeleteAccountForm, FormSchema, InviteMemberForm, RemoveMemberForm,
    SignInForm, SignUpForm, UpdateAccountForm, UpdatePasswordForm,
};
pub use outcome::{
    messages, paths, ActionResult, EchoedFields, SessionChange,
};
