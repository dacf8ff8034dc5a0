//! 客户端 IP 提取
//!
//! 默认使用 TCP 对端地址；只有对端在可信代理列表内时才读取
//! X-Forwarded-For / X-Real-IP。未配置可信代理时，来自私有网段
//! 的连接视为反向代理。

use std::net::{IpAddr, SocketAddr};

use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;
use tracing::{debug, warn};

/// 检查 IP 是否为私有地址或 localhost
pub fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_loopback(),
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || (v6.segments()[0] & 0xfe00) == 0xfc00 // fc00::/7 ULA
                || (v6.segments()[0] & 0xffc0) == 0xfe80 // fe80::/10 link-local
        }
    }
}

/// 单条代理规则
#[derive(Debug, Clone, PartialEq, Eq)]
enum ProxyRule {
    Addr(IpAddr),
    Cidr(IpAddr, u8),
}

impl ProxyRule {
    fn parse(s: &str) -> Option<Self> {
        match s.split_once('/') {
            Some((network, prefix)) => {
                let network: IpAddr = network.trim().parse().ok()?;
                let prefix: u8 = prefix.trim().parse().ok()?;
                let max = if network.is_ipv4() { 32 } else { 128 };
                (prefix <= max).then_some(ProxyRule::Cidr(network, prefix))
            }
            None => s.trim().parse().ok().map(ProxyRule::Addr),
        }
    }

    fn matches(&self, ip: &IpAddr) -> bool {
        match self {
            ProxyRule::Addr(addr) => addr == ip,
            ProxyRule::Cidr(network, prefix) => ip_in_network(ip, network, *prefix),
        }
    }
}

fn ip_in_network(ip: &IpAddr, network: &IpAddr, prefix: u8) -> bool {
    match (ip, network) {
        (IpAddr::V4(ip), IpAddr::V4(net)) => {
            let mask = u32::MAX.checked_shl(32 - prefix as u32).unwrap_or(0);
            (u32::from(*ip) & mask) == (u32::from(*net) & mask)
        }
        (IpAddr::V6(ip), IpAddr::V6(net)) => {
            let mask = u128::MAX.checked_shl(128 - prefix as u32).unwrap_or(0);
            (u128::from(*ip) & mask) == (u128::from(*net) & mask)
        }
        _ => false,
    }
}

/// 已解析的可信代理列表
#[derive(Debug, Clone, Default)]
pub struct TrustedProxies {
    rules: Vec<ProxyRule>,
}

impl TrustedProxies {
    pub fn parse(entries: &[String]) -> Self {
        let rules = entries
            .iter()
            .filter_map(|entry| {
                let rule = ProxyRule::parse(entry);
                if rule.is_none() {
                    warn!("Ignoring invalid trusted proxy entry: {}", entry);
                }
                rule
            })
            .collect();
        Self { rules }
    }

    pub fn from_config() -> Self {
        Self::parse(&crate::config::get_config().server.trusted_proxies)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn contains(&self, ip: &IpAddr) -> bool {
        self.rules.iter().any(|rule| rule.matches(ip))
    }

    /// 根据对端地址与请求头决定客户端 IP
    pub fn resolve(&self, peer: Option<&str>, headers: &HeaderMap) -> Option<String> {
        let peer_ip = peer.and_then(parse_peer_ip);

        let Some(peer_ip) = peer_ip else {
            return forwarded_ip_from_headers(headers);
        };

        let behind_proxy = if self.is_empty() {
            is_private_or_local(&peer_ip)
        } else {
            self.contains(&peer_ip)
        };

        if behind_proxy && let Some(real_ip) = forwarded_ip_from_headers(headers) {
            debug!("Client IP via proxy {}: {}", peer_ip, real_ip);
            return Some(real_ip);
        }

        Some(peer_ip.to_string())
    }
}

/// 解析 "ip" 或 "ip:port"
fn parse_peer_ip(peer: &str) -> Option<IpAddr> {
    peer.parse::<SocketAddr>()
        .map(|s| s.ip())
        .or_else(|_| peer.parse::<IpAddr>())
        .ok()
}

/// 从请求头提取转发的 IP（X-Forwarded-For 第一个，其次 X-Real-IP）
pub fn forwarded_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

/// 从 HttpRequest 提取真实客户端 IP
pub fn extract_client_ip(req: &HttpRequest, proxies: &TrustedProxies) -> Option<String> {
    proxies.resolve(req.peer_addr().map(|a| a.to_string()).as_deref(), req.headers())
}
