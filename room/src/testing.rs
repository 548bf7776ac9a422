//! Helpers shared by unit tests

use tokio::sync::mpsc::UnboundedReceiver;

use crate::host::{HostHandle, HostRequest};

/// Host handle with the local user already resolved (or not)
pub(crate) fn host_as(user_id: Option<&str>) -> (HostHandle, UnboundedReceiver<HostRequest>) {
    let (host, rx) = HostHandle::channel();
    host.set_user_id(user_id.map(str::to_string));
    (host, rx)
}

/// Wire lines queued so far, other requests discarded
pub(crate) fn sent_lines(rx: &mut UnboundedReceiver<HostRequest>) -> Vec<String> {
    drain_requests(rx)
        .into_iter()
        .filter_map(|request| match request {
            HostRequest::Send(msg) => Some(msg.to_wire_format()),
            _ => None,
        })
        .collect()
}

pub(crate) fn drain_requests(rx: &mut UnboundedReceiver<HostRequest>) -> Vec<HostRequest> {
    let mut requests = Vec::new();
    while let Ok(request) = rx.try_recv() {
        requests.push(request);
    }
    requests
}
