//! Contract bindings used on Arc.

use alloy_sol_types::sol;

sol! {
    #[sol(rpc)]
    contract SignalVault {
        event PositionOpened(
            uint256 indexed positionId,
            string marketId,
            bool isLongYes,
            uint256 entryPrice,
            uint256 collateral,
            uint256 leverage,
            address indexed trader
        );

        function settlePosition(uint256 positionId) external;
    }
}

// Circle CCTP v1 TokenMessenger
sol! {
    #[sol(rpc)]
    contract ITokenMessenger {
        function depositForBurn(
            uint256 amount,
            uint32 destinationDomain,
            bytes32 mintRecipient,
            address burnToken
        ) external returns (uint64 nonce);
    }
}

sol! {
    #[sol(rpc)]
    contract IERC20 {
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
    }
}
