use clap::{ArgAction, CommandFactory, Parser};

use crate::options::Limit;

const COMMANDS_HELP: &str = "\
Commands:
  STRING      GET SET SETNX SETEX PSETEX MGET MSET MSETNX INCR INCRBY INCRBYFLOAT
              DECR DECRBY APPEND STRLEN GETRANGE SETRANGE
  HASH        HGET HSET HMSET HSETNX HMGET HGETALL HDEL HEXISTS HKEYS HVALS HLEN
              HINCRBY HINCRBYFLOAT HSCAN
  LIST        LPUSH RPUSH LPUSHX RPUSHX LPOP RPOP LRANGE LLEN LINDEX LSET LREM
              LTRIM LINSERT LPOS LMOVE
  SET         SADD SREM SMEMBERS SISMEMBER SMISMEMBER SCARD SPOP SRANDMEMBER
              SINTER SINTERSTORE SUNION SUNIONSTORE SDIFF SDIFFSTORE SMOVE SSCAN
  SORTED SET  ZADD ZREM ZSCORE ZMSCORE ZRANK ZREVRANK ZRANGE ZRANGEBYSCORE
              ZREVRANGE ZREVRANGEBYSCORE ZCARD ZCOUNT ZINCRBY ZPOPMIN ZPOPMAX
              ZREMRANGEBYRANK ZREMRANGEBYSCORE ZINTERSTORE ZUNIONSTORE ZSCAN
  KEY         DEL UNLINK EXISTS EXPIRE EXPIREAT PEXPIRE PEXPIREAT TTL PTTL PERSIST
              KEYS SCAN TYPE RENAME RENAMENX COPY DUMP OBJECT RANDOMKEY TOUCH
  SERVER      DBSIZE FLUSHDB FLUSHALL PING ECHO TIME INFO
  JSON        JSON.SET JSON.GET JSON.DEL

Scan commands take [MATCH pattern] [COUNT count] after the cursor.
Operands starting with '-' other than negative numbers (e.g. -inf) go after '--'.

Examples:
  redis-rest-cli SET session:123 \"data\" --ex 3600
  redis-rest-cli HSET user:1 name John email john@example.com age 30
  redis-rest-cli LRANGE tasks 0 -1
  redis-rest-cli ZADD leaderboard 1000 player1 1500 player2
  redis-rest-cli ZRANGE leaderboard 0 -1 --withscores --rev
  redis-rest-cli SCAN 0 MATCH 'user:*' COUNT 100
  redis-rest-cli --json JSON.SET doc $ '{\"tags\":[\"a\",\"b\"]}'";

/// Send one Redis command to a REST key-value endpoint
#[derive(Debug, Parser)]
#[clap(disable_help_flag = true)]
#[command(author, version, about, after_long_help = COMMANDS_HELP)]
pub struct Args {
    /// REST endpoint URL
    #[arg(long, env = "UPSTASH_REDIS_REST_URL", help_heading = "Connection")]
    pub url: Option<String>,
    /// REST bearer token
    #[arg(
        long,
        env = "UPSTASH_REDIS_REST_TOKEN",
        hide_env_values = true,
        help_heading = "Connection"
    )]
    pub token: Option<String>,
    /// Request timeout in seconds [default: 30]
    #[arg(
        long,
        value_name = "SECS",
        env = "UPSTASH_REDIS_REST_TIMEOUT",
        help_heading = "Connection"
    )]
    pub timeout: Option<u64>,
    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
    /// Show this help
    #[arg(short = 'h', long, action = ArgAction::SetTrue)]
    pub help: bool,
    #[command(flatten)]
    pub flags: Flags,
    /// Command name followed by its operands
    #[arg(value_name = "COMMAND", allow_negative_numbers = true)]
    pub command: Vec<String>,
}

/// Modifier flags shared by the command families.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct Flags {
    /// Expire after N seconds
    #[arg(long, value_name = "SECONDS", help_heading = "SET options")]
    pub ex: Option<i64>,
    /// Expire after N milliseconds
    #[arg(long, value_name = "MS", help_heading = "SET options")]
    pub px: Option<i64>,
    /// Expire at a Unix time in seconds
    #[arg(long, value_name = "TS", help_heading = "SET options")]
    pub exat: Option<i64>,
    /// Expire at a Unix time in milliseconds
    #[arg(long, value_name = "TS", help_heading = "SET options")]
    pub pxat: Option<i64>,
    /// Only write if the key (or sorted-set member) does not exist
    #[arg(long, help_heading = "SET options")]
    pub nx: bool,
    /// Only write if the key (or sorted-set member) already exists
    #[arg(long, help_heading = "SET options")]
    pub xx: bool,
    /// Retain the existing TTL
    #[arg(long, help_heading = "SET options")]
    pub keepttl: bool,
    /// Return the old value
    #[arg(long, help_heading = "SET options")]
    pub get: bool,

    /// Only update when the new score is greater
    #[arg(long, help_heading = "ZADD options")]
    pub gt: bool,
    /// Only update when the new score is less
    #[arg(long, help_heading = "ZADD options")]
    pub lt: bool,
    /// Return the number of changed elements
    #[arg(long, help_heading = "ZADD options")]
    pub ch: bool,

    /// Include scores in the result
    #[arg(long, help_heading = "ZRANGE options")]
    pub withscores: bool,
    /// Interpret the range as scores
    #[arg(long, help_heading = "ZRANGE options")]
    pub byscore: bool,
    /// Interpret the range lexicographically
    #[arg(long, help_heading = "ZRANGE options")]
    pub bylex: bool,
    /// Reverse the order
    #[arg(long, help_heading = "ZRANGE options")]
    pub rev: bool,
    /// Page the result, e.g. 0,10
    #[arg(long, value_name = "OFF,COUNT", help_heading = "ZRANGE options")]
    pub limit: Option<Limit>,

    /// Parse value operands as JSON
    #[arg(long)]
    pub json: bool,
}

/// A command name with its operands and flags.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub name: String,
    pub operands: Vec<String>,
    pub flags: Flags,
}

impl Invocation {
    pub fn new<S: Into<String>>(name: S, operands: Vec<String>, flags: Flags) -> Self {
        Invocation {
            name: name.into(),
            operands,
            flags,
        }
    }
}

impl Args {
    /// Split the positionals into command name and operands, `None` when no
    /// command was given.
    pub fn invocation(&self) -> Option<Invocation> {
        let (name, operands) = self.command.split_first()?;
        Some(Invocation::new(name.as_str(), operands.to_vec(), self.flags.clone()))
    }
}

pub fn print_help() -> std::io::Result<()> {
    Args::command().print_long_help()
}
