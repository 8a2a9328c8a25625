use clap::Parser;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "wproxy", about, version, long_about = None)]
pub struct WProxyArguments {
    #[arg(long = "addr", help = "Address to listen on [default: 0.0.0.0]")]
    pub addr: Option<String>,
    #[arg(long = "port", help = "Port to listen on [default: 8888]")]
    pub port: Option<String>,
    #[arg(short = 'a', long = "auth", value_name = "USER:PASSWORD", help = "Enable proxy authentication with the given credential (e.g. tt:123)")]
    pub auth: Option<String>,
    #[arg(long = "tproxy", help = "Transparent proxy mode, forwards the real client IP in X-Forwarded-For")]
    pub tproxy: bool,
    #[arg(long = "debug", help = "Debug mode, logs every proxied request")]
    pub debug: bool,
    #[arg(short = 'c', long = "config", help = "Path to a JSON configuration file, command line flags take precedence")]
    pub config_path: Option<String>,
    #[arg(short = 'v', long = "verbose", help = "Enable verbose logging")]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_arguments() {
        let args = WProxyArguments::try_parse_from(["wproxy"]).unwrap();
        assert_eq!(args.addr, None);
        assert_eq!(args.port, None);
        assert_eq!(args.auth, None);
        assert!(!args.tproxy);
        assert!(!args.debug);
        assert!(!args.verbose);
        assert_eq!(args.config_path, None);
    }

    #[test]
    fn test_parse_all_arguments() {
        let args = WProxyArguments::try_parse_from([
            "wproxy", "--addr", "127.0.0.1", "--port", "3128", "-a", "tt:123", "--tproxy", "--debug", "-c", "./wproxy.json", "-v",
        ])
        .unwrap();
        assert_eq!(args.addr.as_deref(), Some("127.0.0.1"));
        assert_eq!(args.port.as_deref(), Some("3128"));
        assert_eq!(args.auth.as_deref(), Some("tt:123"));
        assert!(args.tproxy);
        assert!(args.debug);
        assert!(args.verbose);
        assert_eq!(args.config_path.as_deref(), Some("./wproxy.json"));
    }

    #[test]
    fn test_parse_unknown_flag_fails() {
        assert!(WProxyArguments::try_parse_from(["wproxy", "--socks"]).is_err());
    }
}
