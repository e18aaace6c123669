use std::net::{IpAddr, Ipv4Addr};

use tokio::net::TcpListener;

pub const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Binds a loopback listener on a port whose neighbours are both usable.
pub async fn listener_with_neighbours() -> anyhow::Result<(TcpListener, u16)> {
    loop {
        let listener: TcpListener = TcpListener::bind((LOCALHOST, 0)).await?;
        let port: u16 = listener.local_addr()?.port();
        if port > 1 && port < u16::MAX {
            return Ok((listener, port));
        }
    }
}
