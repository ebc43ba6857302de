use crate::admin::command::{BridgeReply, FriendCommand};
use crate::admin::generators::Generator;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// Work handed to a session's own task, so it runs between two client frames.
#[derive(Debug)]
pub enum SessionMessage {
    Bridge {
        command: FriendCommand,
        reply: oneshot::Sender<BridgeReply>,
    },

    Bulk {
        generator: Generator,
        start: usize,
        count: Option<usize>,
        cancel: CancellationToken,
    },
}
