/// Creates a single chat [`Message`](crate::Message) from a role shorthand.
///
/// ```rust
/// use parley::{Role, parley_msg};
///
/// let message = parley_msg!(user => "What's the weather in Paris?");
/// assert_eq!(message.role, Role::User);
/// assert_eq!(message.content, "What's the weather in Paris?");
/// ```
#[macro_export]
macro_rules! parley_msg {
    (system => $content:expr $(,)?) => {
        $crate::Message::system($content)
    };
    (user => $content:expr $(,)?) => {
        $crate::Message::user($content)
    };
    (assistant => $content:expr $(,)?) => {
        $crate::Message::assistant($content, ::std::vec::Vec::new())
    };
    ($role:ident => $content:expr $(,)?) => {
        compile_error!("unsupported role: use system, user, or assistant; tool messages need a call id");
    };
}

/// Creates a `Vec<Message>` batch for [`ChatService::run_turn`](crate::ChatService::run_turn).
///
/// ```rust
/// use parley::{Role, parley_messages};
///
/// let batch = parley_messages![
///     system => "Answer in one sentence.",
///     user => "What's the weather in Paris?",
/// ];
///
/// assert_eq!(batch.len(), 2);
/// assert_eq!(batch[0].role, Role::System);
/// ```
#[macro_export]
macro_rules! parley_messages {
    () => {
        ::std::vec::Vec::<$crate::Message>::new()
    };
    ($($role:ident => $content:expr),+ $(,)?) => {
        vec![$($crate::parley_msg!($role => $content)),+]
    };
}
